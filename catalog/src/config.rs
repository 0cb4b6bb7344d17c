use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_MAX_BATCH_IDS: usize = 50;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("max_batch_ids must be at least 1")]
    InvalidBatchSize,

    #[error("store ttl cannot be 0")]
    ZeroTtl,
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum StoreType {
    Memory,
    Redis { url: String },
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct StoreConfig {
    #[serde(flatten)]
    pub r#type: StoreType,
    /// How long stored hotels stay readable after the last run wrote them.
    #[serde(with = "humantime_serde", default = "default_ttl")]
    pub ttl: Duration,
}

fn default_ttl() -> Duration {
    DEFAULT_TTL
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl.is_zero() {
            return Err(ValidationError::ZeroTtl);
        }
        Ok(())
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct ApiConfig {
    #[serde(default)]
    pub listener: Listener,
    /// Upper bound on ids accepted by a single range lookup.
    #[serde(default = "default_max_batch_ids")]
    pub max_batch_ids: usize,
}

fn default_max_batch_ids() -> usize {
    DEFAULT_MAX_BATCH_IDS
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            listener: Listener::default(),
            max_batch_ids: DEFAULT_MAX_BATCH_IDS,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        if self.max_batch_ids == 0 {
            return Err(ValidationError::InvalidBatchSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store() {
        let config: StoreConfig =
            serde_yaml::from_str("type: redis\nurl: redis://127.0.0.1:6379/0\nttl: 12h").unwrap();
        assert_eq!(
            config.r#type,
            StoreType::Redis {
                url: "redis://127.0.0.1:6379/0".into()
            }
        );
        assert_eq!(config.ttl, Duration::from_secs(12 * 3600));

        let config: StoreConfig = serde_yaml::from_str("type: memory").unwrap();
        assert_eq!(config.r#type, StoreType::Memory);
        assert_eq!(config.ttl, DEFAULT_TTL);

        assert!(serde_yaml::from_str::<StoreConfig>("type: postgres").is_err());
    }

    #[test]
    fn test_api_defaults_and_validation() {
        let config: ApiConfig = serde_yaml::from_str("listener:\n  host: 0.0.0.0\n  port: 9000").unwrap();
        assert_eq!(config.max_batch_ids, 50);
        assert!(config.validate().is_ok());

        let mut invalid = config.clone();
        invalid.listener.port = 0;
        assert_eq!(invalid.validate(), Err(ValidationError::InvalidPort));

        let mut invalid = config;
        invalid.max_batch_ids = 0;
        assert_eq!(invalid.validate(), Err(ValidationError::InvalidBatchSize));
    }
}
