//! Cookie session settings read from the environment.
//!
//! | Variable | Meaning | Debug default |
//! |---|---|---|
//! | `SESSION_KEY_FILE` | key material, at least 64 bytes in release | ephemeral key |
//! | `SESSION_COOKIE_SECURE` | mark the cookie `Secure` | `true` |
//! | `SESSION_SAMESITE` | `Strict`, `Lax` or `None` | `Lax` |
//! | `SESSION_ALLOW_EPHEMERAL` | accept a generated key when the file is unreadable | `false` |
//!
//! Debug builds log a warning and fall back to the default for missing or
//! malformed values. Release builds reject them.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const DEFAULT_KEY_PATH: &str = "/run/secrets/tracker_session_key";
const MIN_KEY_LEN: usize = 64;
// Shortest input `Key::derive_from` accepts.
const MIN_DERIVE_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether configuration problems are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Fall back to defaults with a warning.
    Debug,
    /// Reject missing or malformed values.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// Return `fallback` in debug builds (after logging), `error` otherwise.
    fn tolerate<T>(self, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        match self {
            Self::Debug => {
                warn!(%error, "session configuration problem; using default");
                Ok(fallback)
            }
            Self::Release => Err(error),
        }
    }
}

/// Where the signing key came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeySource {
    /// Derived from the contents of this file.
    File(PathBuf),
    /// Generated at startup; sessions do not survive a restart.
    Ephemeral,
}

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Origin of [`SessionSettings::key`].
    pub key_source: KeySource,
    /// Whether the cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
}

/// Errors raised while reading session configuration.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    /// A variable is required in release builds.
    #[error("{name} must be set")]
    Missing {
        /// Variable name.
        name: &'static str,
    },
    /// A variable holds an unrecognised value.
    #[error("{name}='{value}' is invalid; expected {expected}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted forms.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("cannot read session key {path}: {source}")]
    KeyUnreadable {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short for the build mode.
    #[error("session key {path} has {length} bytes; at least {min} are required")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Actual length.
        length: usize,
        /// Required length.
        min: usize,
    },
    /// `SameSite=None` without a `Secure` cookie.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys were requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL is not permitted in release builds")]
    EphemeralInRelease,
}

/// Read session settings through `env`.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use tracker::inbound::http::session_config::{BuildMode, KeySource, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/key".to_owned()),
///     _ => None,
/// });
/// let settings = session_settings_from_env(&env, BuildMode::Debug).unwrap();
/// assert_eq!(settings.key_source, KeySource::Ephemeral);
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = read_flag(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = read_same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = read_flag(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralInRelease);
    }
    let (key, key_source) = read_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        key_source,
        cookie_secure,
        same_site,
    })
}

fn read_flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return mode.tolerate(default, SessionConfigError::Missing { name });
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => mode.tolerate(
            default,
            SessionConfigError::Invalid {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn read_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return mode.tolerate(fallback, SessionConfigError::Missing { name: SAMESITE_ENV });
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => mode.tolerate(SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => mode.tolerate(
            fallback,
            SessionConfigError::Invalid {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn read_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<(Key, KeySource), SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
    );
    let min = match mode {
        BuildMode::Debug => MIN_DERIVE_LEN,
        BuildMode::Release => MIN_KEY_LEN,
    };
    match std::fs::read(&path).map(Zeroizing::new) {
        Ok(bytes) if bytes.len() < min => Err(SessionConfigError::KeyTooShort {
            length: bytes.len(),
            path,
            min,
        }),
        Ok(bytes) => Ok((Key::derive_from(&bytes), KeySource::File(path))),
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using an ephemeral session key");
            Ok((Key::generate(), KeySource::Ephemeral))
        }
        Err(source) => Err(SessionConfigError::KeyUnreadable { path, source }),
    }
}
