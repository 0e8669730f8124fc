//! Service configuration from environment variables.
//!
//! | Variable              | Default                          |
//! |-----------------------|----------------------------------|
//! | `OPENAI_API_KEY`      | unset                            |
//! | `OPENAI_BASE_URL`     | `https://api.openai.com/v1`      |
//! | `OPENAI_MODEL`        | `gpt-4o-mini`                    |
//! | `ELEVENLABS_API_KEY`  | unset                            |
//! | `ELEVENLABS_BASE_URL` | `https://api.elevenlabs.io/v1`   |
//! | `PORT`                | `3001`                           |
//! | `PERSONA_DATA_DIR`    | `data/personalities`             |
//! | `HTTP_TIMEOUT_SECS`   | `120`                            |
//! | `MAX_BODY_BYTES`      | `102400`                         |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::llms::base_llm::DEFAULT_MODEL;
use crate::llms::providers::openai::{DEFAULT_TIMEOUT_SECS, OPENAI_BASE_URL};
use crate::speech::elevenlabs::ELEVENLABS_BASE_URL;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_PERSONA_DATA_DIR: &str = "data/personalities";
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the server binary.
#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub port: u16,
    pub persona_data_dir: PathBuf,
    pub http_timeout: Duration,
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.into()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: get("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|| ELEVENLABS_BASE_URL.into()),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            persona_data_dir: get("PERSONA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PERSONA_DATA_DIR)),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?),
            max_body_bytes: parse_or("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), DEFAULT_MAX_BODY_BYTES)?,
        })
    }

    /// Log a warning for each missing API key. Calls made without a key fail
    /// at request time.
    pub fn warn_missing_keys(&self) {
        if self.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; persona calls will return fallback results");
        }
        if self.elevenlabs_api_key.is_none() {
            tracing::warn!("ELEVENLABS_API_KEY not set; voice synthesis will fail");
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "<redacted>");
        f.debug_struct("AppConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("elevenlabs_api_key", &redact(&self.elevenlabs_api_key))
            .field("elevenlabs_base_url", &self.elevenlabs_base_url)
            .field("port", &self.port)
            .field("persona_data_dir", &self.persona_data_dir)
            .field("http_timeout", &self.http_timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = tokio_test::assert_ok!(load(&[]));
        assert_eq!(config.port, 3001);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.elevenlabs_base_url, "https://api.elevenlabs.io/v1");
        assert_eq!(config.persona_data_dir, PathBuf::from("data/personalities"));
        assert_eq!(config.http_timeout, Duration::from_secs(120));
        assert_eq!(config.max_body_bytes, 102_400);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("HTTP_TIMEOUT_SECS", " 30 "),
            ("PERSONA_DATA_DIR", "/srv/personas"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.persona_data_dir, PathBuf::from("/srv/personas"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = load(&[("OPENAI_API_KEY", ""), ("PORT", "  ")]).unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(load(&[("MAX_BODY_BYTES", "-1")]).is_err());
        assert!(load(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = load(&[("OPENAI_API_KEY", "sk-secret"), ("ELEVENLABS_API_KEY", "el-secret")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("el-secret"));
    }
}
