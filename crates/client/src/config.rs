//! Client configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// The landing dashboard refetches every five minutes.
pub const DEFAULT_DASHBOARD_REFRESH: Duration = Duration::from_secs(5 * 60);
/// Failed queries are retried once.
pub const DEFAULT_QUERY_RETRIES: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Where the CLI persists the token pair.
    pub token_path: PathBuf,
    pub dashboard_refresh: Duration,
    pub query_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_path: default_token_path(),
            dashboard_refresh: DEFAULT_DASHBOARD_REFRESH,
            query_retries: DEFAULT_QUERY_RETRIES,
        }
    }
}

impl ClientConfig {
    /// Read configuration from `DELIVERYHUB_*` environment variables,
    /// falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup("DELIVERYHUB_API_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty { name: "DELIVERYHUB_API_URL" });
            }
            Some(url) => config.api_url = url.trim().trim_end_matches('/').to_string(),
            None => tracing::warn!("DELIVERYHUB_API_URL not set; using {DEFAULT_API_URL}"),
        }

        if let Some(secs) = parse_secs(&lookup, "DELIVERYHUB_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "DELIVERYHUB_DASHBOARD_REFRESH_SECS")? {
            config.dashboard_refresh = secs;
        }
        if let Some(path) = lookup("DELIVERYHUB_TOKEN_PATH").filter(|p| !p.trim().is_empty()) {
            config.token_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

fn parse_secs<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deliveryhub")
        .join("tokens.json")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.dashboard_refresh, DEFAULT_DASHBOARD_REFRESH);
        assert_eq!(config.query_retries, 1);
        assert!(config.token_path.ends_with("deliveryhub/tokens.json"));
    }

    #[test]
    fn overrides_are_read() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DELIVERYHUB_API_URL", "https://api.example.com/v1/"),
            ("DELIVERYHUB_REQUEST_TIMEOUT_SECS", "5"),
            ("DELIVERYHUB_TOKEN_PATH", "/tmp/dh.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.token_path, PathBuf::from("/tmp/dh.json"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let vars = lookup(&[("DELIVERYHUB_DASHBOARD_REFRESH_SECS", "soon")]);
        let err = ClientConfig::from_lookup(vars).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                name: "DELIVERYHUB_DASHBOARD_REFRESH_SECS",
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn blank_api_url_is_rejected() {
        assert!(ClientConfig::from_lookup(lookup(&[("DELIVERYHUB_API_URL", " ")])).is_err());
    }
}
