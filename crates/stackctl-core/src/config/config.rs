//! Configuration management for stackctl
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format with support for multiple named profiles.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{ConfigError, Result};
use super::retry::RetrySettings;
use crate::progress::WaitOptions;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
///
/// Every field is optional; anything left unset falls back to the SDK's own
/// resolution (environment, `~/.aws/config`, instance metadata).
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Profile {
    /// AWS region, e.g. `us-west-2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Named profile in the shared AWS config/credentials files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,
    /// Endpoint override, e.g. a LocalStack URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// How long to wait for stacks to settle
    #[serde(default)]
    pub wait: WaitSettings,
    /// SDK retry behavior
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Wait loop settings stored in a profile
///
/// Both values must be at least one second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitSettings {
    /// Maximum time to wait in seconds
    #[serde(default = "default_timeout_secs", deserialize_with = "positive_secs")]
    pub timeout_secs: u64,
    /// Polling interval in seconds
    #[serde(default = "default_interval_secs", deserialize_with = "positive_secs")]
    pub interval_secs: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl WaitSettings {
    /// Convert into wait loop options
    #[must_use]
    pub fn to_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            interval: Duration::from_secs(self.interval_secs),
        }
    }
}

fn default_timeout_secs() -> u64 {
    3600
}

fn default_interval_secs() -> u64 {
    30
}

fn positive_secs<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    if secs == 0 {
        return Err(de::Error::custom("must be at least 1 second"));
    }
    Ok(secs)
}

impl Config {
    /// Resolve which profile to use
    ///
    /// An explicit name must exist. Otherwise the configured default wins,
    /// then the alphabetically first profile. `None` means no profile is
    /// configured and the SDK defaults apply.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<Option<String>> {
        if let Some(profile_name) = explicit_profile {
            if !self.profiles.contains_key(profile_name) {
                return Err(ConfigError::ProfileNotFound {
                    name: profile_name.to_string(),
                });
            }
            return Ok(Some(profile_name.to_string()));
        }

        if let Some(ref default) = self.default_profile {
            if !self.profiles.contains_key(default) {
                return Err(ConfigError::ProfileNotFound {
                    name: default.clone(),
                });
            }
            return Ok(Some(default.clone()));
        }

        Ok(self.list_profiles().first().map(|(name, _)| (*name).clone()))
    }

    /// Get a profile by name
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, this supports both the standard macOS path and Linux-style ~/.config path:
    /// 1. Check ~/.config/stackctl/config.toml (Linux-style, preferred for consistency)
    /// 2. Fall back to ~/Library/Application Support/dev.stackctl.stackctl/config.toml
    ///
    /// On Linux: ~/.config/stackctl/config.toml
    /// On Windows: %APPDATA%\stackctl\stackctl\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("stackctl")
                    .join("config.toml");

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("dev", "stackctl", "stackctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as-is so unused profiles don't break loading.
    ///
    /// Example:
    /// ```toml
    /// region = "${AWS_REGION:-us-east-1}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}
