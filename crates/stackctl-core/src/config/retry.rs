//! Retry configuration for the SDK clients
//!
//! Stored per profile and handed to the SDK's standard retry strategy. The
//! workflows themselves never retry a failed call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum number of attempts per request (1 disables retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl RetrySettings {
    /// Initial backoff as a [`Duration`]
    #[must_use]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Convert into the SDK retry configuration
    #[must_use]
    pub fn to_sdk(&self) -> aws_config::retry::RetryConfig {
        if self.max_attempts <= 1 {
            return aws_config::retry::RetryConfig::disabled();
        }
        aws_config::retry::RetryConfig::standard()
            .with_max_attempts(self.max_attempts)
            .with_initial_backoff(self.initial_backoff())
    }
}

// Default value functions for serde
fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sdk_standard_mode() {
        let retry = RetrySettings::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.initial_backoff(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let retry: RetrySettings = toml::from_str("max_attempts = 5").unwrap();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_backoff_ms, 1000);
    }

    #[test]
    fn test_single_attempt_disables_retries() {
        let retry = RetrySettings {
            max_attempts: 1,
            initial_backoff_ms: 10,
        };
        assert_eq!(retry.to_sdk().max_attempts(), 1);
    }

    #[test]
    fn test_to_sdk_carries_attempts() {
        let retry = RetrySettings {
            max_attempts: 7,
            initial_backoff_ms: 250,
        };
        let sdk = retry.to_sdk();
        assert_eq!(sdk.max_attempts(), 7);
        assert_eq!(sdk.initial_backoff(), Duration::from_millis(250));
    }
}
