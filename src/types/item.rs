use serde::Deserialize;
use serde::Serialize;

use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringMode {
    Disabled,
    Sampling,
    #[default]
    Reporting,
}

/// Which timestamps the server attaches to reported values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampsToReturn {
    Source,
    Server,
    #[default]
    Both,
    Neither,
}

/// Requested sampling behaviour of a monitored item. The client handle is
/// not part of it: handles are always assigned by the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitoringParameters {
    /// Sampling interval in milliseconds; 0 asks for the fastest practical rate
    pub sampling_interval: f64,
    pub queue_size: u32,
    pub discard_oldest: bool,
}

/// Caller-supplied request to watch (or re-parameterize) a node.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorRequest {
    pub node_id: NodeId,
    pub monitoring_mode: MonitoringMode,
    /// `None` falls back to the configured defaults on add, and is skipped
    /// on modify
    pub monitoring_parameters: Option<MonitoringParameters>,
}

impl MonitorRequest {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            monitoring_mode: MonitoringMode::Reporting,
            monitoring_parameters: None,
        }
    }

    pub fn with_mode(
        mut self,
        mode: MonitoringMode,
    ) -> Self {
        self.monitoring_mode = mode;
        self
    }

    pub fn with_parameters(
        mut self,
        parameters: MonitoringParameters,
    ) -> Self {
        self.monitoring_parameters = Some(parameters);
        self
    }
}

/// A server-confirmed pairing of a node and its server-assigned item id.
///
/// Only produced by a successful add; the id has no meaning otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItem {
    pub(crate) id: u32,
    pub(crate) handle: u32,
    pub(crate) node_id: NodeId,
    pub(crate) revised_sampling_interval: f64,
    pub(crate) revised_queue_size: u32,
}

impl MonitoredItem {
    /// Monitored item id assigned by the server
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Client handle assigned by the subscription
    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn revised_sampling_interval(&self) -> f64 {
        self.revised_sampling_interval
    }

    pub fn revised_queue_size(&self) -> u32 {
        self.revised_queue_size
    }
}
