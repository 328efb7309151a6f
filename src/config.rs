use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Result, SharpApiError};

pub(crate) const DEFAULT_BASE_URL: &str = "https://sharpapi.com/api/v1";
pub(crate) const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub(crate) const DEFAULT_POLL_MAX_WAIT_SECS: u64 = 180;
pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// One week.
pub(crate) const MAX_POLL_MAX_WAIT_SECS: u64 = 7 * 24 * 60 * 60;
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("SharpAPIRustAgent/", env!("CARGO_PKG_VERSION"));

pub(crate) const ENV_API_KEY: &str = "SHARP_API_KEY";
const ENV_BASE_URL: &str = "SHARP_API_BASE_URL";
const ENV_POLL_INTERVAL: &str = "SHARP_API_JOB_STATUS_POLLING_INTERVAL";
const ENV_POLL_WAIT: &str = "SHARP_API_JOB_STATUS_POLLING_WAIT";
const ENV_USER_AGENT: &str = "SHARP_API_USER_AGENT";

/// Settings for a SharpAPI client.
///
/// Build one with [`ClientConfig::new`], [`ClientConfig::from_env`], or
/// deserialize it from your own configuration file; every field except
/// `api_key` has a default. The value is checked by [`validate`](Self::validate)
/// when a client is constructed and never changes afterwards.
///
/// ```
/// use sharpapi_resume_parser::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{ "api_key": "key" }"#).unwrap();
/// assert_eq!(config.poll_interval_secs, 5);
/// assert_eq!(config.poll_max_wait_secs, 180);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds between status checks. Must be at least 1.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Ceiling on the whole polling phase. Must be >= `poll_interval_secs`.
    #[serde(default = "default_poll_max_wait")]
    pub poll_max_wait_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for each individual HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_poll_max_wait() -> u64 {
    DEFAULT_POLL_MAX_WAIT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ClientConfig {
    /// Configuration with the given key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            poll_max_wait_secs: DEFAULT_POLL_MAX_WAIT_SECS,
            user_agent: default_user_agent(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Read configuration from `SHARP_API_*` environment variables.
    ///
    /// `SHARP_API_KEY` is required. `SHARP_API_BASE_URL`,
    /// `SHARP_API_JOB_STATUS_POLLING_INTERVAL`, `SHARP_API_JOB_STATUS_POLLING_WAIT`
    /// and `SHARP_API_USER_AGENT` override the defaults when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| SharpApiError::config(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self::new(api_key);

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(secs) = env_secs(ENV_POLL_INTERVAL)? {
            config.poll_interval_secs = secs;
        }
        if let Some(secs) = env_secs(ENV_POLL_WAIT)? {
            config.poll_max_wait_secs = secs;
        }
        if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
            config.user_agent = agent;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a client relies on.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(SharpApiError::config("API key must not be empty"));
        }
        if self.base_url.trim().is_empty() {
            return Err(SharpApiError::config("base URL must not be empty"));
        }
        if self.poll_interval_secs < 1 {
            return Err(SharpApiError::config(
                "poll interval must be at least 1 second",
            ));
        }
        if self.poll_max_wait_secs < self.poll_interval_secs {
            return Err(SharpApiError::config(format!(
                "poll max wait ({}s) must not be shorter than the poll interval ({}s)",
                self.poll_max_wait_secs, self.poll_interval_secs
            )));
        }
        if self.poll_max_wait_secs > MAX_POLL_MAX_WAIT_SECS {
            return Err(SharpApiError::config(format!(
                "poll max wait ({}s) must not exceed {MAX_POLL_MAX_WAIT_SECS}s",
                self.poll_max_wait_secs
            )));
        }
        if self.request_timeout_secs < 1 {
            return Err(SharpApiError::config(
                "request timeout must be at least 1 second",
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_max_wait(&self) -> Duration {
        Duration::from_secs(self.poll_max_wait_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_secs(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| SharpApiError::config(format!("{name} must be a whole number of seconds, got {raw:?}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, "https://sharpapi.com/api/v1");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.poll_max_wait(), Duration::from_secs(180));
        assert!(config.user_agent.starts_with("SharpAPIRustAgent/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = ClientConfig::new("").validate().unwrap_err();
        assert!(matches!(err, SharpApiError::Configuration { .. }));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = ClientConfig::new("key");
        config.poll_interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(SharpApiError::Configuration { .. })
        ));
    }

    #[test]
    fn max_wait_shorter_than_interval_is_rejected() {
        let mut config = ClientConfig::new("key");
        config.poll_interval_secs = 10;
        config.poll_max_wait_secs = 5;
        assert!(matches!(
            config.validate(),
            Err(SharpApiError::Configuration { .. })
        ));

        config.poll_max_wait_secs = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_max_wait_is_rejected() {
        let mut config = ClientConfig::new("key");
        config.poll_max_wait_secs = u64::MAX;
        assert!(matches!(
            config.validate(),
            Err(SharpApiError::Configuration { .. })
        ));

        config.poll_max_wait_secs = MAX_POLL_MAX_WAIT_SECS;
        assert!(config.validate().is_ok());
    }

    // Env vars are process-global, so every from_env case lives in one test.
    #[test]
    fn from_env_merges_overrides_and_rejects_bad_numbers() {
        const VARS: [&str; 5] = [
            ENV_API_KEY,
            ENV_BASE_URL,
            ENV_POLL_INTERVAL,
            ENV_POLL_WAIT,
            ENV_USER_AGENT,
        ];
        for var in VARS {
            std::env::remove_var(var);
        }

        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, SharpApiError::Configuration { .. }));

        std::env::set_var(ENV_API_KEY, "env_key");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key, "env_key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);

        std::env::set_var(ENV_BASE_URL, "http://localhost:9000/api/v1");
        std::env::set_var(ENV_POLL_INTERVAL, "3");
        std::env::set_var(ENV_POLL_WAIT, " 60 ");
        std::env::set_var(ENV_USER_AGENT, "EnvAgent/1.0");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/api/v1");
        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.poll_max_wait_secs, 60);
        assert_eq!(config.user_agent, "EnvAgent/1.0");

        std::env::set_var(ENV_POLL_INTERVAL, "five");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, SharpApiError::Configuration { .. }));

        std::env::set_var(ENV_POLL_INTERVAL, "90");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, SharpApiError::Configuration { .. }));

        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "api_key": "key",
            "poll_interval_secs": 2,
        }))
        .unwrap();
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.poll_max_wait_secs, 180);
        assert_eq!(config.request_timeout_secs, 60);
    }
}
