use std::{num::NonZeroUsize, time::Duration};

use crate::{error::ConfigError, policy::RetryPolicy};

/// Per-request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const TIMEOUT_ENV: &str = "MANDEL_NODE_TIMEOUT_SECS";
pub const MAX_RETRIES_ENV: &str = "MANDEL_MAX_RETRIES";
pub const RETRY_BACKOFF_ENV: &str = "MANDEL_RETRY_BACKOFF_MS";
pub const PARTITIONS_ENV: &str = "MANDEL_PARTITIONS";

#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    /// Applied to every outbound request; expiry fails the partition.
    pub timeout: Duration,
    /// Number of partitions; defaults to one per node address.
    pub partitions: Option<NonZeroUsize>,
    pub retry: RetryPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            partitions: None,
            retry: RetryPolicy::none(),
        }
    }
}

impl DispatcherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, falling back to the defaults for unset keys.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let seconds: f64 = parse(TIMEOUT_ENV, &raw, "expected seconds")?;
            config.timeout = timeout_from_secs(seconds).ok_or_else(|| ConfigError::Invalid {
                key: TIMEOUT_ENV,
                value: raw.clone(),
                reason: "timeout must be a positive number of seconds",
            })?;
        }
        if let Some(raw) = lookup(MAX_RETRIES_ENV) {
            config.retry.max_retries = parse(MAX_RETRIES_ENV, &raw, "expected a retry count")?;
        }
        if let Some(raw) = lookup(RETRY_BACKOFF_ENV) {
            let millis: u64 = parse(RETRY_BACKOFF_ENV, &raw, "expected milliseconds")?;
            config.retry.backoff = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup(PARTITIONS_ENV) {
            config.partitions = Some(parse(PARTITIONS_ENV, &raw, "expected a positive count")?);
        }

        Ok(config)
    }
}

pub fn timeout_from_secs(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}

fn parse<T: std::str::FromStr>(
    key: &'static str,
    raw: &str,
    reason: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason,
    })
}
