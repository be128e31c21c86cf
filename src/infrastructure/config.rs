use crate::core::grading::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::env;
use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub service_timeout: Duration,
    pub log_dir: String,
    /// Present when a language-model grader is configured.
    pub grader: Option<GraderConfig>,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Log directory on its own, so logging can start even when the rest of the
/// configuration is invalid.
pub fn log_dir_from_env() -> String {
    log_dir_from_lookup(|name| env::var(name).ok())
}

pub fn log_dir_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("CONVERSA_LOG_DIR")
        .filter(|dir| !dir.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_timeout = match lookup("CONVERSA_SERVICE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|source| ConfigError::Parse {
                    name: "CONVERSA_SERVICE_TIMEOUT_SECS",
                    source,
                })?;
                if secs == 0 {
                    return Err(ConfigError::Zero("CONVERSA_SERVICE_TIMEOUT_SECS"));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_dir = log_dir_from_lookup(&lookup);

        let grader = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| GraderConfig {
                api_key,
                base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            });

        Ok(Self {
            service_timeout,
            log_dir,
            grader,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.service_timeout, Duration::from_secs(30));
        assert_eq!(config.log_dir, "logs");
        assert!(config.grader.is_none());
    }

    #[test]
    fn api_key_enables_grader() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
        ]))
        .unwrap();
        let grader = config.grader.unwrap();
        assert_eq!(grader.api_key, "sk-test");
        assert_eq!(grader.model, "gpt-4o");
        assert_eq!(grader.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[("CONVERSA_SERVICE_TIMEOUT_SECS", "soon")]));
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
        let err = Config::from_lookup(lookup(&[("CONVERSA_SERVICE_TIMEOUT_SECS", "0")]));
        assert!(matches!(err, Err(ConfigError::Zero(_))));
    }

    #[test]
    fn log_dir_resolves_despite_invalid_config() {
        let vars = lookup(&[
            ("CONVERSA_SERVICE_TIMEOUT_SECS", "0"),
            ("CONVERSA_LOG_DIR", "/var/log/conversa"),
        ]);
        assert!(Config::from_lookup(&vars).is_err());
        assert_eq!(log_dir_from_lookup(&vars), "/var/log/conversa");
        assert_eq!(log_dir_from_lookup(lookup(&[])), DEFAULT_LOG_DIR);
    }
}
