//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for reaching a tracker server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRACKER_CLIENT")]
pub struct ClientSettings {
    /// Server origin.
    #[ortho_config(default = String::from("http://localhost:8080"))]
    pub base_url: String,
    /// Whole-request timeout in seconds.
    #[ortho_config(default = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

impl ClientSettings {
    /// Server origin without surrounding whitespace.
    pub fn base_url(&self) -> &str {
        self.base_url.trim()
    }

    /// Request timeout. Zero falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        let secs = match self.request_timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        Duration::from_secs(secs)
    }
}
