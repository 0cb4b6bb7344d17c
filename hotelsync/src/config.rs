use catalog::config::{ApiConfig, Listener, StoreConfig};
use ingest::config::SuppliersConfig;
use serde::Deserialize;
use std::fs::File;
use std::time::Duration;

const DEFAULT_SCHEDULE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Deserialize, Debug, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct ScheduleConfig {
    #[serde(with = "humantime_serde", default = "default_interval")]
    pub interval: Duration,
}

fn default_interval() -> Duration {
    DEFAULT_SCHEDULE_INTERVAL
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            interval: DEFAULT_SCHEDULE_INTERVAL,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub suppliers: SuppliersConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub admin_listener: Option<Listener>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.suppliers.validate()?;
        self.store.validate()?;
        self.api.validate()?;
        if let Some(admin) = &self.admin_listener {
            admin.validate()?;
        }
        if self.schedule.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self
            .common
            .metrics
            .as_ref()
            .is_some_and(|metrics| metrics.statsd_port == 0)
        {
            return Err(ConfigError::InvalidStatsdPort);
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid suppliers config: {0}")]
    Suppliers(#[from] ingest::config::ValidationError),
    #[error("invalid store or api config: {0}")]
    Catalog(#[from] catalog::config::ValidationError),
    #[error("schedule interval cannot be 0")]
    ZeroInterval,
    #[error("statsd port cannot be 0")]
    InvalidStatsdPort,
}
