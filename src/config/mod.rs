//! Configuration for the node monitor.
//!
//! Sources are merged with the following priority (later overrides earlier):
//! 1. Type defaults (hardcoded)
//! 2. Configuration file named by the `MONITOR_CONFIG_PATH` environment variable
//! 3. Environment variables with the `MONITOR__` prefix (highest priority)

mod monitored_item;
mod subscription;
pub use monitored_item::*;
pub use subscription::*;

#[cfg(test)]
mod config_test;

//---
use std::env;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;
use crate::TimestampsToReturn;

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG_PATH";
const ENV_PREFIX: &str = "MONITOR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Default parameters for transport-level subscriptions
    #[serde(default)]
    pub subscription: SubscriptionParameters,

    /// Default monitoring parameters for newly added items
    #[serde(default)]
    pub monitored_item: MonitoredItemDefaults,

    /// Depth of the internal notification buffer for callback subscriptions
    #[serde(default = "default_callback_buffer_len")]
    pub callback_buffer_len: usize,

    /// Depth of the internal notification buffer for channel subscriptions
    #[serde(default = "default_channel_buffer_len")]
    pub channel_buffer_len: usize,

    /// Seed of the client handle counter; the first handle is seed + 1
    #[serde(default = "default_initial_client_handle")]
    pub initial_client_handle: u32,

    #[serde(default)]
    pub timestamps_to_return: TimestampsToReturn,

    /// Upper bound for a single mutating RPC (unit: milliseconds)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            subscription: SubscriptionParameters::default(),
            monitored_item: MonitoredItemDefaults::default(),
            callback_buffer_len: default_callback_buffer_len(),
            channel_buffer_len: default_channel_buffer_len(),
            initial_client_handle: default_initial_client_handle(),
            timestamps_to_return: TimestampsToReturn::default(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl MonitorConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// # Note
    /// Validation is deferred so that further overrides can be applied with
    /// [`with_override_config`](Self::with_override_config). Callers must
    /// call [`validate`](Self::validate) before using the configuration.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("MONITOR_CONFIG_PATH", "config/monitor.toml");
    /// std::env::set_var("MONITOR__CALLBACK_BUFFER_LEN", "1024");
    /// let cfg = MonitorConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional overrides from a file, then environment variables
    /// again. Does not validate.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates the configuration and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        if self.callback_buffer_len == 0 {
            return Err(Error::Config(ConfigError::Message(
                "callback_buffer_len must be greater than 0".into(),
            )));
        }

        if self.channel_buffer_len == 0 {
            return Err(Error::Config(ConfigError::Message(
                "channel_buffer_len must be greater than 0".into(),
            )));
        }

        if self.request_timeout_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "request_timeout_ms must be at least 1ms".into(),
            )));
        }

        self.subscription.validate()?;
        self.monitored_item.validate()?;

        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

fn default_callback_buffer_len() -> usize {
    8192
}
fn default_channel_buffer_len() -> usize {
    16
}
fn default_initial_client_handle() -> u32 {
    100
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
