// src/config/models.rs
use super::ServiceTarget;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

/// Validated input to the wait engine.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    pub timeout_secs: u64,
    pub interval_secs: u64,
    pub targets: Vec<ServiceTarget>,
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs > self.timeout_secs {
            return Err(ConfigError::IntervalExceedsTimeout {
                interval: self.interval_secs,
                timeout: self.timeout_secs,
            });
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        Ok(())
    }
}

/// On-disk shape of `--config`. Every field is optional so the command
/// line can fill in or override any of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitFile {
    pub timeout_secs: Option<u64>,
    pub interval_secs: Option<u64>,
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid service url {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid service scheme {0:?}, expected tcp, http or https")]
    UnsupportedScheme(String),

    #[error("service {0:?} has no host")]
    MissingHost(String),

    #[error("tcp service {0:?} needs an explicit port")]
    MissingPort(String),

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("host {0:?} has no matching port")]
    UnpairedHost(String),

    #[error("timeout ({timeout}s) needs to be greater than check interval ({interval}s)")]
    IntervalExceedsTimeout { interval: u64, timeout: u64 },

    #[error("must provide at least one service argument")]
    NoTargets,
}
