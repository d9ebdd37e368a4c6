//! Client side of the tracker: a mirror store kept in sync with the server
//! through the [`TrackerRemote`] port.

pub mod config;
pub mod http_remote;
pub mod mirror;
pub mod remote;

pub use config::ClientSettings;
pub use http_remote::HttpTrackerRemote;
pub use mirror::{MirrorError, MirrorState, MirrorStore};
#[cfg(test)]
pub use remote::MockTrackerRemote;
pub use remote::{RemoteError, TrackerRemote};
