//! Request and response shapes exchanged with the transport for batch
//! monitored-item operations.

use crate::MonitoringMode;
use crate::MonitoringParameters;
use crate::NodeId;
use crate::StatusCode;

/// Attribute id of the `Value` attribute
pub const ATTRIBUTE_ID_VALUE: u32 = 13;

#[derive(Debug, Clone, PartialEq)]
pub struct ReadValueId {
    pub node_id: NodeId,
    pub attribute_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItemCreateRequest {
    pub item_to_monitor: ReadValueId,
    pub monitoring_mode: MonitoringMode,
    pub client_handle: u32,
    pub requested_parameters: MonitoringParameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItemModifyRequest {
    pub monitored_item_id: u32,
    pub client_handle: u32,
    pub requested_parameters: MonitoringParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResponseHeader {
    pub service_result: StatusCode,
}

impl ResponseHeader {
    pub fn new(service_result: StatusCode) -> Self {
        Self { service_result }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItemCreateResult {
    pub status_code: StatusCode,
    pub monitored_item_id: u32,
    pub revised_sampling_interval: f64,
    pub revised_queue_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItemModifyResult {
    pub status_code: StatusCode,
    pub revised_sampling_interval: f64,
    pub revised_queue_size: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateMonitoredItemsResponse {
    pub header: ResponseHeader,
    pub results: Vec<MonitoredItemCreateResult>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModifyMonitoredItemsResponse {
    pub header: ResponseHeader,
    pub results: Vec<MonitoredItemModifyResult>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteMonitoredItemsResponse {
    pub header: ResponseHeader,
    pub results: Vec<StatusCode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetMonitoringModeResponse {
    pub header: ResponseHeader,
    pub results: Vec<StatusCode>,
}

/// Server-side diagnostics for a single subscription
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubscriptionDiagnostics {
    pub subscription_id: u32,
    pub priority: u8,
    pub publishing_interval: f64,
    pub max_keep_alive_count: u32,
    pub max_lifetime_count: u32,
    pub max_notifications_per_publish: u32,
    pub publishing_enabled: bool,
    pub modify_count: u32,
    pub publish_request_count: u32,
    pub data_change_notifications_count: u32,
    pub notifications_count: u32,
    pub unacknowledged_message_count: u32,
    pub discarded_message_count: u32,
    pub monitored_item_count: u32,
    pub disabled_monitored_item_count: u32,
    pub monitoring_queue_overflow_count: u32,
    pub next_sequence_number: u32,
}

/// Per-item outcome of a batch response
pub trait ItemResult {
    fn status(&self) -> StatusCode;
}

impl ItemResult for StatusCode {
    fn status(&self) -> StatusCode {
        *self
    }
}

impl ItemResult for MonitoredItemCreateResult {
    fn status(&self) -> StatusCode {
        self.status_code
    }
}

impl ItemResult for MonitoredItemModifyResult {
    fn status(&self) -> StatusCode {
        self.status_code
    }
}
