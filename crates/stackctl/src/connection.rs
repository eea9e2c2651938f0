//! Connection management for the AWS SDK clients

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use stackctl_core::config::{Config, Profile, RetrySettings};
use stackctl_core::stacks::CloudFormationApi;
use stackctl_core::WaitOptions;

use crate::error::Result as CliResult;

/// Values given on the command line that win over the profile
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub wait_timeout: Option<u64>,
    pub wait_interval: Option<u64>,
}

/// Settings for one invocation after merging profile and overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub profile_name: Option<String>,
    pub region: Option<String>,
    pub aws_profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub wait: WaitOptions,
    pub retry: RetrySettings,
}

/// Holds the loaded configuration and builds SDK clients from it
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Load the configuration from an explicit file or the default location
    pub fn load(config_file: Option<&str>) -> CliResult<Self> {
        let (config, config_path) = match config_file {
            Some(file) => {
                let path = PathBuf::from(file);
                debug!("Loading config from explicit path: {:?}", path);
                (Config::load_from_path(&path)?, Some(path))
            }
            None => {
                debug!("Loading config from default location");
                (Config::load()?, None)
            }
        };
        Ok(Self::with_config_path(config, config_path))
    }

    /// Merge the selected profile with command-line overrides
    pub fn resolve(
        &self,
        profile_name: Option<&str>,
        overrides: &Overrides,
    ) -> CliResult<ResolvedSettings> {
        let resolved_name = self.config.resolve_profile(profile_name)?;
        let profile = resolved_name
            .as_deref()
            .and_then(|name| self.config.profile(name))
            .cloned()
            .unwrap_or_else(Profile::default);

        match &resolved_name {
            Some(name) => info!("Using profile: {}", name),
            None => debug!("No profile configured, using SDK defaults"),
        }

        let mut wait = profile.wait.to_options();
        if let Some(secs) = overrides.wait_timeout {
            wait.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.wait_interval {
            wait.interval = Duration::from_secs(secs);
        }

        Ok(ResolvedSettings {
            profile_name: resolved_name,
            region: overrides.region.clone().or(profile.region),
            aws_profile: profile.aws_profile,
            endpoint_url: profile.endpoint_url,
            wait,
            retry: profile.retry,
        })
    }

    /// Load the SDK configuration for the resolved settings
    pub async fn sdk_config(&self, settings: &ResolvedSettings) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(settings.retry.to_sdk());

        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(aws_profile) = &settings.aws_profile {
            loader = loader.profile_name(aws_profile);
        }
        if let Some(endpoint) = &settings.endpoint_url {
            info!("Using endpoint override: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        debug!(
            "SDK config loaded for profile {:?}, region {:?}",
            settings.profile_name,
            sdk_config.region()
        );
        sdk_config
    }

    /// Build the CloudFormation client
    pub async fn stack_api(&self, settings: &ResolvedSettings) -> CloudFormationApi {
        CloudFormationApi::new(&self.sdk_config(settings).await)
    }
}
