//! Transport abstraction for the publish/subscribe session.
//!
//! The session client that performs the protocol handshake, encodes wire
//! messages and runs the publish loop lives outside this crate. The monitor
//! only relies on the capabilities below: opening a subscription whose raw
//! notifications are pushed into a bounded sink, and issuing batch RPCs
//! against that subscription.

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use crate::CreateMonitoredItemsResponse;
use crate::DeleteMonitoredItemsResponse;
use crate::ModifyMonitoredItemsResponse;
use crate::MonitoredItemCreateRequest;
use crate::MonitoredItemModifyRequest;
use crate::MonitoringMode;
use crate::PublishNotification;
use crate::Result;
use crate::SetMonitoringModeResponse;
use crate::SubscriptionDiagnostics;
use crate::SubscriptionParameters;
use crate::TimestampsToReturn;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Opens a transport-level subscription.
    ///
    /// Raw notifications for the subscription must be pushed into
    /// `notifications`. The transport should never block indefinitely on
    /// this sink; the receiving side is drained by a single notification
    /// pump.
    async fn subscribe(
        &self,
        params: SubscriptionParameters,
        notifications: mpsc::Sender<PublishNotification>,
    ) -> Result<Arc<dyn TransportSubscription>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransportSubscription: Send + Sync + 'static {
    /// Server-assigned subscription id
    fn id(&self) -> u32;

    async fn cancel(&self) -> Result<()>;

    async fn modify(
        &self,
        params: SubscriptionParameters,
    ) -> Result<()>;

    async fn monitor(
        &self,
        timestamps: TimestampsToReturn,
        requests: Vec<MonitoredItemCreateRequest>,
    ) -> Result<CreateMonitoredItemsResponse>;

    async fn unmonitor(
        &self,
        item_ids: Vec<u32>,
    ) -> Result<DeleteMonitoredItemsResponse>;

    async fn modify_monitored_items(
        &self,
        timestamps: TimestampsToReturn,
        requests: Vec<MonitoredItemModifyRequest>,
    ) -> Result<ModifyMonitoredItemsResponse>;

    async fn set_monitoring_mode(
        &self,
        mode: MonitoringMode,
        item_ids: Vec<u32>,
    ) -> Result<SetMonitoringModeResponse>;

    async fn stats(&self) -> Result<SubscriptionDiagnostics>;
}
