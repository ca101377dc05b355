use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::MonitoringParameters;
use crate::Result;

/// Monitoring parameters applied to add requests that carry none
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MonitoredItemDefaults {
    /// Sampling interval (unit: milliseconds); 0 means fastest practical rate
    #[serde(default)]
    pub sampling_interval_ms: f64,

    #[serde(default = "default_queue_size")]
    pub queue_size: u32,

    #[serde(default = "default_discard_oldest")]
    pub discard_oldest: bool,
}

impl Default for MonitoredItemDefaults {
    fn default() -> Self {
        Self {
            sampling_interval_ms: 0.0,
            queue_size: default_queue_size(),
            discard_oldest: default_discard_oldest(),
        }
    }
}

impl MonitoredItemDefaults {
    pub fn parameters(&self) -> MonitoringParameters {
        MonitoringParameters {
            sampling_interval: self.sampling_interval_ms,
            queue_size: self.queue_size,
            discard_oldest: self.discard_oldest,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sampling_interval_ms.is_finite() || self.sampling_interval_ms < 0.0 {
            return Err(Error::Config(ConfigError::Message(format!(
                "sampling_interval_ms must be a non-negative number, got {}",
                self.sampling_interval_ms
            ))));
        }
        Ok(())
    }
}

fn default_queue_size() -> u32 {
    10
}
fn default_discard_oldest() -> bool {
    true
}
