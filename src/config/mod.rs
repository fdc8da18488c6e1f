//! Configuration handling for the application.
//!
//! Everything is read from environment variables with development defaults,
//! so the binary runs without any setup beyond exporting API credentials.
//! Platform API keys are optional: when one is missing the corresponding
//! adapter reports a typed extraction failure at request time instead of
//! preventing startup, and every other source keeps working.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable names. Keeping them public lets other crates (tests,
/// build scripts) refer to them if needed later.
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_TWITTER_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
pub const ENV_MODEL_DIR: &str = "MODEL_DIR";

/// Default development values used when environment variables are absent.
const DEFAULT_MODEL_DIR: &str = "model";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    youtube_api_key: Option<String>,
    twitter_bearer_token: Option<String>,
    model_dir: PathBuf,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(
        youtube_api_key: Option<String>,
        twitter_bearer_token: Option<String>,
        model_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            youtube_api_key,
            twitter_bearer_token,
            model_dir: model_dir.into(),
        }
    }

    /// Load from environment variables, falling back to development defaults.
    ///
    /// This never fails today because we only do simple string extraction.
    /// In the future, validation (e.g. minimum key length) can cause it to
    /// return a `ConfigError`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let youtube_api_key = env::var(ENV_YOUTUBE_API_KEY).ok().filter(|v| !v.is_empty());
        let twitter_bearer_token = env::var(ENV_TWITTER_BEARER_TOKEN)
            .ok()
            .filter(|v| !v.is_empty());
        let model_dir = env::var(ENV_MODEL_DIR).unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string());
        // Placeholder spot for future validation hooks.
        Ok(Self {
            youtube_api_key,
            twitter_bearer_token,
            model_dir: PathBuf::from(model_dir),
        })
    }

    /// YouTube Data API v3 key, if configured.
    pub fn youtube_api_key(&self) -> Option<&str> {
        self.youtube_api_key.as_deref()
    }
    /// Twitter API v2 bearer token, if configured.
    pub fn twitter_bearer_token(&self) -> Option<&str> {
        self.twitter_bearer_token.as_deref()
    }
    /// Directory holding the frozen model artifacts.
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Reserved for future validation failures.
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [ENV_YOUTUBE_API_KEY, ENV_TWITTER_BEARER_TOKEN, ENV_MODEL_DIR] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.youtube_api_key(), None);
        assert_eq!(cfg.twitter_bearer_token(), None);
        assert_eq!(cfg.model_dir(), Path::new(super::DEFAULT_MODEL_DIR));
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_YOUTUBE_API_KEY, "yt-key");
            env::set_var(ENV_TWITTER_BEARER_TOKEN, "tw-token");
            env::set_var(ENV_MODEL_DIR, "/var/lib/shelfmark/model");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.youtube_api_key(), Some("yt-key"));
        assert_eq!(cfg.twitter_bearer_token(), Some("tw-token"));
        assert_eq!(cfg.model_dir(), Path::new("/var/lib/shelfmark/model"));
    }

    #[test]
    fn empty_credentials_treated_as_absent() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_YOUTUBE_API_KEY, "");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.youtube_api_key(), None);
    }
}
