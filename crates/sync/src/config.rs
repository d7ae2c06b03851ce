//! Configuration for the synchronization layer.
//!
//! Loaded from environment variables with an optional `.env` override file,
//! then validated before use. Every knob has a production default so an
//! empty environment yields a working configuration.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading or validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("Failed to load .env file from {path}: {source}")]
    EnvFileLoad {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

const VAR_MAX_CONCURRENT: &str = "CLAIMSTATE_MAX_CONCURRENT_RECONCILES";
const VAR_RESYNC_SECONDS: &str = "CLAIMSTATE_RESYNC_SECONDS";
const VAR_RETRY_DELAY_MS: &str = "CLAIMSTATE_RETRY_DELAY_MS";
const VAR_CYCLE_TIMEOUT_MS: &str = "CLAIMSTATE_CYCLE_TIMEOUT_MS";

/// Tuning knobs for [`SyncWorkerPool`](crate::pool::SyncWorkerPool).
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Upper bound on reconciliation cycles in flight across distinct keys.
    pub max_concurrent_reconciles: usize,

    /// Delay before a successfully synced key is reconciled again. Bounds
    /// the staleness window when a notification is dropped.
    pub resync_period: Duration,

    /// Delay before retrying a key whose cycle failed transiently.
    pub retry_delay: Duration,

    /// Deadline for one reconciliation cycle; a cycle cut off mid-fetch
    /// aborts without mutating the cache.
    pub cycle_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reconciles: 10,
            resync_period: Duration::from_secs(60),
            retry_delay: Duration::from_secs(10),
            cycle_timeout: Duration::from_secs(30),
        }
    }
}

impl SyncConfig {
    /// Loads configuration from the environment, with values from the
    /// optional `.env` file taking precedence.
    pub fn from_env(env_file: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = env_file {
            dotenv::from_path(&path).map_err(|source| ConfigError::EnvFileLoad {
                path: path.clone(),
                source,
            })?;
        }

        let defaults = Self::default();
        let config = Self {
            max_concurrent_reconciles: parse_var(
                VAR_MAX_CONCURRENT,
                defaults.max_concurrent_reconciles,
            )?,
            resync_period: Duration::from_secs(parse_var(
                VAR_RESYNC_SECONDS,
                defaults.resync_period.as_secs(),
            )?),
            retry_delay: Duration::from_millis(parse_var(
                VAR_RETRY_DELAY_MS,
                defaults.retry_delay.as_millis() as u64,
            )?),
            cycle_timeout: Duration::from_millis(parse_var(
                VAR_CYCLE_TIMEOUT_MS,
                defaults.cycle_timeout.as_millis() as u64,
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_reconciles == 0 {
            return Err(ConfigError::Validation(
                "max_concurrent_reconciles must be greater than zero".to_string(),
            ));
        }
        if self.resync_period.is_zero() {
            return Err(ConfigError::Validation(
                "resync_period must be greater than zero".to_string(),
            ));
        }
        if self.retry_delay.is_zero() {
            // A zero delay turns persistent transient failures into a hot loop.
            return Err(ConfigError::Validation(
                "retry_delay must be greater than zero".to_string(),
            ));
        }
        if self.cycle_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "cycle_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, default: T) -> Result<T> {
    match std::env::var(var) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
