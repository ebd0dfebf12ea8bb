//! Runtime configuration, loaded from environment variables with defaults.

use core_config::{ConfigError, FromEnv, env_or_default};
use spec_discovery::fetch::DEFAULT_USER_AGENT;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// User-Agent sent with every discovery fetch
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = env_or_default("MOJ_HTTP_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|error: std::num::ParseIntError| ConfigError::ParseError {
                key: "MOJ_HTTP_TIMEOUT_SECS".to_string(),
                details: error.to_string(),
            })?;

        Ok(Self {
            user_agent: env_or_default("MOJ_USER_AGENT", DEFAULT_USER_AGENT),
            timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        temp_env::with_vars_unset(["MOJ_USER_AGENT", "MOJ_HTTP_TIMEOUT_SECS"], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
            assert_eq!(config.timeout(), Duration::from_secs(30));
        });
    }

    #[test]
    fn invalid_timeout_is_a_parse_error() {
        temp_env::with_var("MOJ_HTTP_TIMEOUT_SECS", Some("soon"), || {
            let error = Config::from_env().unwrap_err();
            assert!(matches!(error, ConfigError::ParseError { .. }));
        });
    }
}
