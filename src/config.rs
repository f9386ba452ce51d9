use std::net::SocketAddr;

use thiserror::Error;

use crate::upstream::{DEFAULT_COMPLETION_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

/// Application-level constants
pub const APP_NAME: &str = "MediPredict";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tag reported as `aiModel` when the upstream model answers.
pub const UPSTREAM_MODEL_TAG: &str = "groq-llama3";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_HISTORY_CAPACITY: usize = 500;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medipredict=info,medipredict_lib=info,tower_http=warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Upstream model settings. Present only when an API key is configured.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Runtime configuration for the service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub upstream: Option<UpstreamConfig>,
    pub history_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            upstream: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (testable without env mutation).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("MEDIPREDICT_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                var: "MEDIPREDICT_BIND",
                value: bind_raw.clone(),
            })?;

        let history_capacity = match get("MEDIPREDICT_HISTORY_CAPACITY") {
            Some(raw) => parse_number(&raw, "MEDIPREDICT_HISTORY_CAPACITY")?,
            None => DEFAULT_HISTORY_CAPACITY,
        };

        let upstream = match get("GROQ_API_KEY") {
            Some(api_key) => {
                let timeout_secs = match get("MEDIPREDICT_UPSTREAM_TIMEOUT_SECS") {
                    Some(raw) => parse_number(&raw, "MEDIPREDICT_UPSTREAM_TIMEOUT_SECS")?,
                    None => DEFAULT_TIMEOUT_SECS,
                };
                if timeout_secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        var: "MEDIPREDICT_UPSTREAM_TIMEOUT_SECS",
                        value: "0".into(),
                    });
                }
                Some(UpstreamConfig {
                    url: get("MEDIPREDICT_UPSTREAM_URL")
                        .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
                    api_key: api_key.trim().to_string(),
                    model: get("MEDIPREDICT_UPSTREAM_MODEL")
                        .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                    timeout_secs,
                })
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            upstream,
            history_capacity,
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, var: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
        assert!(config.upstream.is_none());
        assert_eq!(config.history_capacity, 500);
    }

    #[test]
    fn api_key_enables_upstream() {
        let config = ServiceConfig::from_lookup(lookup(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        let upstream = config.upstream.unwrap();
        assert_eq!(upstream.api_key, "gsk_test");
        assert_eq!(upstream.model, DEFAULT_MODEL);
        assert_eq!(upstream.url, DEFAULT_COMPLETION_URL);
        assert_eq!(upstream.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn blank_api_key_disables_upstream() {
        let config = ServiceConfig::from_lookup(lookup(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert!(config.upstream.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("MEDIPREDICT_BIND", "0.0.0.0:9000"),
            ("MEDIPREDICT_HISTORY_CAPACITY", "25"),
            ("GROQ_API_KEY", "k"),
            ("MEDIPREDICT_UPSTREAM_MODEL", "llama-3.1-8b-instant"),
            ("MEDIPREDICT_UPSTREAM_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.history_capacity, 25);
        let upstream = config.upstream.unwrap();
        assert_eq!(upstream.model, "llama-3.1-8b-instant");
        assert_eq!(upstream.timeout_secs, 3);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(ServiceConfig::from_lookup(lookup(&[("MEDIPREDICT_BIND", "nope")])).is_err());
        assert!(
            ServiceConfig::from_lookup(lookup(&[("MEDIPREDICT_HISTORY_CAPACITY", "-1")])).is_err()
        );
        assert!(ServiceConfig::from_lookup(lookup(&[
            ("GROQ_API_KEY", "k"),
            ("MEDIPREDICT_UPSTREAM_TIMEOUT_SECS", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn app_name_is_medipredict() {
        assert_eq!(APP_NAME, "MediPredict");
    }
}
