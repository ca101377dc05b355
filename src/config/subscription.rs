use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Parameters of a transport-level subscription. Passed through to the
/// transport opaquely.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SubscriptionParameters {
    /// Publishing interval (unit: milliseconds)
    #[serde(default = "default_publishing_interval_ms")]
    pub publishing_interval_ms: u64,

    /// Publishing cycles without a publish request before the server drops
    /// the subscription
    #[serde(default = "default_lifetime_count")]
    pub lifetime_count: u32,

    /// Publishing cycles without notifications before a keep-alive is sent
    #[serde(default = "default_max_keep_alive_count")]
    pub max_keep_alive_count: u32,

    #[serde(default = "default_max_notifications_per_publish")]
    pub max_notifications_per_publish: u32,

    #[serde(default)]
    pub priority: u8,
}

impl Default for SubscriptionParameters {
    fn default() -> Self {
        Self {
            publishing_interval_ms: default_publishing_interval_ms(),
            lifetime_count: default_lifetime_count(),
            max_keep_alive_count: default_max_keep_alive_count(),
            max_notifications_per_publish: default_max_notifications_per_publish(),
            priority: 0,
        }
    }
}

impl SubscriptionParameters {
    pub fn validate(&self) -> Result<()> {
        if self.publishing_interval_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "publishing_interval_ms must be greater than 0".into(),
            )));
        }

        if self.max_keep_alive_count == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_keep_alive_count must be greater than 0".into(),
            )));
        }

        if (self.lifetime_count as u64) < 3 * self.max_keep_alive_count as u64 {
            return Err(Error::Config(ConfigError::Message(format!(
                "lifetime_count ({}) must be at least 3 x max_keep_alive_count ({})",
                self.lifetime_count, self.max_keep_alive_count
            ))));
        }

        Ok(())
    }
}

fn default_publishing_interval_ms() -> u64 {
    100
}
fn default_lifetime_count() -> u32 {
    10_000
}
fn default_max_keep_alive_count() -> u32 {
    3_000
}
fn default_max_notifications_per_publish() -> u32 {
    10_000
}
