//! A live subscription: owns the item indices and the batch mutation
//! operations.
//!
//! Every mutation holds the index write lock for its whole critical
//! section, RPC round-trip included, so at most one mutating RPC per
//! subscription is in flight and the pump never observes a half-applied
//! batch. Index changes are only committed after the whole batch has been
//! accepted by the server.

use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::HandleAllocator;
use super::ItemIndex;
use crate::ItemResult;
use crate::MonitorConfig;
use crate::MonitorRequest;
use crate::MonitoredItem;
use crate::MonitoredItemCreateRequest;
use crate::MonitoredItemCreateResult;
use crate::MonitoredItemModifyRequest;
use crate::MonitoringMode;
use crate::MonitoringParameters;
use crate::NodeId;
use crate::ReadValueId;
use crate::RequestError;
use crate::ResponseHeader;
use crate::Result;
use crate::SubscriptionDiagnostics;
use crate::SubscriptionParameters;
use crate::TransportSubscription;
use crate::ATTRIBUTE_ID_VALUE;

/// State shared between a [`Subscription`] and its notification pump.
pub(crate) struct SubscriptionState {
    pub(crate) id: u32,
    pub(crate) index: RwLock<ItemIndex>,
    pub(crate) delivered: AtomicU64,
    pub(crate) dropped: AtomicU64,
    closed: AtomicBool,
    pub(crate) close_signal: CancellationToken,
}

impl SubscriptionState {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            index: RwLock::new(ItemIndex::default()),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            close_signal: CancellationToken::new(),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Flips the state to closed and fires the close signal. Returns `false`
    /// if the subscription was already closed.
    fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.close_signal.cancel();
        true
    }
}

/// An open subscription. Nodes can be added and removed concurrently.
///
/// The caller must call [`unsubscribe`](Self::unsubscribe) to cancel the
/// transport-level subscription. Cancelling the token passed at creation
/// stops delivery, but `unsubscribe` must still be called.
pub struct Subscription {
    state: Arc<SubscriptionState>,
    transport: Arc<dyn TransportSubscription>,
    handles: Arc<HandleAllocator>,
    config: Arc<MonitorConfig>,
}

impl Subscription {
    pub(crate) fn new(
        transport: Arc<dyn TransportSubscription>,
        handles: Arc<HandleAllocator>,
        config: Arc<MonitorConfig>,
    ) -> Self {
        Self {
            state: Arc::new(SubscriptionState::new(transport.id())),
            transport,
            handles,
            config,
        }
    }

    pub(crate) fn state(&self) -> Arc<SubscriptionState> {
        self.state.clone()
    }

    /// Transport-level subscription id
    pub fn subscription_id(&self) -> u32 {
        self.state.id
    }

    /// Number of currently monitored items
    pub async fn subscribed(&self) -> usize {
        self.state.index.read().await.len()
    }

    /// Snapshot of the monitored items, ordered by client handle
    pub async fn monitored_items(&self) -> Vec<MonitoredItem> {
        self.state.index.read().await.snapshot()
    }

    /// Number of change messages handed to the consumer
    pub fn delivered(&self) -> u64 {
        self.state.delivered.load(Ordering::Relaxed)
    }

    /// Number of change records dropped because of a slow consumer
    pub fn dropped(&self) -> u64 {
        self.state.dropped.load(Ordering::Relaxed)
    }

    /// Whether the subscription has been unsubscribed or dropped
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Server-side diagnostics of the transport-level subscription
    pub async fn stats(&self) -> Result<SubscriptionDiagnostics> {
        self.transport.stats().await
    }

    /// Modifies the transport-level subscription settings
    pub async fn modify(
        &self,
        params: SubscriptionParameters,
    ) -> Result<()> {
        self.ensure_open()?;
        params.validate()?;
        self.call("modify subscription", self.transport.modify(params))
            .await
    }

    /// Stops the notification pump and cancels the transport-level
    /// subscription. Calls after the first are no-ops.
    pub async fn unsubscribe(&self) -> Result<()> {
        if !self.state.close() {
            debug!(subscription_id = self.state.id, "subscription already closed");
            return Ok(());
        }
        info!(subscription_id = self.state.id, "unsubscribing");
        self.transport.cancel().await
    }

    //-----------------------------------------------------------
    // Add

    /// Adds nodes defined by their string representation
    pub async fn add_nodes(
        &self,
        nodes: &[&str],
    ) -> Result<()> {
        let node_ids = NodeId::parse_all(nodes)?;
        self.add_node_ids(&node_ids).await
    }

    /// Adds nodes in reporting mode with the configured default parameters
    pub async fn add_node_ids(
        &self,
        nodes: &[NodeId],
    ) -> Result<()> {
        let requests = nodes.iter().cloned().map(MonitorRequest::new).collect();
        self.add_monitor_items(requests).await.map(|_| ())
    }

    /// Adds monitored items with explicit mode and parameters.
    ///
    /// Every request gets a fresh client handle. Handles are consumed even
    /// when the batch is rejected. Nothing is added unless every item is
    /// accepted; items the server did create for a rejected batch are
    /// removed again on a best-effort basis.
    ///
    /// A `monitor` call that exceeds the request timeout fails with
    /// [`RequestError::Timeout`]. The server may still have created the
    /// items: their ids are unknown, so they are neither indexed nor
    /// released, and changes for their handles arrive as
    /// [`DispatchError::HandleNotFound`](crate::DispatchError::HandleNotFound)
    /// messages until the subscription is closed.
    pub async fn add_monitor_items(
        &self,
        requests: Vec<MonitorRequest>,
    ) -> Result<Vec<MonitoredItem>> {
        let mut index = self.state.index.write().await;
        self.ensure_open()?;

        // some servers reject an empty create request, others accept it
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let defaults = self.config.monitored_item.parameters();
        let to_add: Vec<MonitoredItemCreateRequest> = requests
            .into_iter()
            .map(|request| MonitoredItemCreateRequest {
                item_to_monitor: ReadValueId {
                    node_id: request.node_id,
                    attribute_id: ATTRIBUTE_ID_VALUE,
                },
                monitoring_mode: request.monitoring_mode,
                client_handle: self.handles.next_handle(),
                requested_parameters: request.monitoring_parameters.unwrap_or(defaults),
            })
            .collect();
        debug!(subscription_id = self.state.id, count = to_add.len(), "adding monitored items");

        let resp = self
            .call(
                "monitor",
                self.transport
                    .monitor(self.config.timestamps_to_return, to_add.clone()),
            )
            .await?;
        check_service_result("monitor", &resp.header)?;
        check_result_count("monitor", to_add.len(), resp.results.len())?;
        if let Err(e) = check_item_statuses("monitor", &resp.results) {
            self.release_created(&resp.results).await;
            return Err(e);
        }

        let items: Vec<MonitoredItem> = to_add
            .into_iter()
            .zip(resp.results)
            .map(|(request, result)| MonitoredItem {
                id: result.monitored_item_id,
                handle: request.client_handle,
                node_id: request.item_to_monitor.node_id,
                revised_sampling_interval: result.revised_sampling_interval,
                revised_queue_size: result.revised_queue_size,
            })
            .collect();
        for item in &items {
            index.insert(item.clone());
        }

        Ok(items)
    }

    /// Unmonitors the items of a rejected batch that the server did create.
    async fn release_created(
        &self,
        results: &[MonitoredItemCreateResult],
    ) {
        let created: Vec<u32> = results
            .iter()
            .filter(|r| r.status_code.is_ok())
            .map(|r| r.monitored_item_id)
            .collect();
        if created.is_empty() {
            return;
        }

        warn!(
            subscription_id = self.state.id,
            ?created,
            "batch add rejected; releasing items created by the server"
        );
        match self
            .call("unmonitor", self.transport.unmonitor(created))
            .await
        {
            Ok(resp) if resp.header.service_result.is_ok() => {}
            Ok(resp) => warn!(
                subscription_id = self.state.id,
                status = %resp.header.service_result,
                "releasing created items failed"
            ),
            Err(e) => error!(subscription_id = self.state.id, error = %e, "releasing created items failed"),
        }
    }

    //-----------------------------------------------------------
    // Remove

    /// Removes nodes defined by their string representation
    pub async fn remove_nodes(
        &self,
        nodes: &[&str],
    ) -> Result<()> {
        let node_ids = NodeId::parse_all(nodes)?;
        self.remove_node_ids(&node_ids).await
    }

    /// Removes every monitored item watching one of `nodes`.
    ///
    /// Fails with [`RequestError::NodeNotFound`] if any node is not watched.
    pub async fn remove_node_ids(
        &self,
        nodes: &[NodeId],
    ) -> Result<()> {
        let mut index = self.state.index.write().await;
        self.ensure_open()?;

        let item_ids = resolve_nodes(&index, nodes)?;
        self.remove_locked(&mut index, item_ids).await
    }

    pub async fn remove_monitor_items(
        &self,
        items: &[MonitoredItem],
    ) -> Result<()> {
        let mut index = self.state.index.write().await;
        self.ensure_open()?;

        let mut item_ids = Vec::with_capacity(items.len());
        for item in items {
            if index.get(item.id).is_none() {
                return Err(RequestError::ItemNotFound(item.id).into());
            }
            if !item_ids.contains(&item.id) {
                item_ids.push(item.id);
            }
        }
        self.remove_locked(&mut index, item_ids).await
    }

    async fn remove_locked(
        &self,
        index: &mut ItemIndex,
        item_ids: Vec<u32>,
    ) -> Result<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        debug!(subscription_id = self.state.id, count = item_ids.len(), "removing monitored items");

        let resp = self
            .call("unmonitor", self.transport.unmonitor(item_ids.clone()))
            .await?;
        check_service_result("unmonitor", &resp.header)?;
        check_result_count("unmonitor", item_ids.len(), resp.results.len())?;
        check_item_statuses("unmonitor", &resp.results)?;

        for id in item_ids {
            index.remove(id);
        }
        Ok(())
    }

    //-----------------------------------------------------------
    // Modify

    /// Applies `parameters` to every item watching one of `nodes`
    pub async fn modify_nodes(
        &self,
        nodes: &[&str],
        parameters: MonitoringParameters,
    ) -> Result<()> {
        let requests = NodeId::parse_all(nodes)?
            .into_iter()
            .map(|node| MonitorRequest::new(node).with_parameters(parameters))
            .collect();
        self.modify_monitor_items(requests).await
    }

    /// Modifies monitoring parameters of watched nodes. Requests without
    /// parameters are skipped; the monitoring mode of a request is ignored
    /// (see [`set_monitoring_mode`](Self::set_monitoring_mode)).
    pub async fn modify_monitor_items(
        &self,
        requests: Vec<MonitorRequest>,
    ) -> Result<()> {
        let mut index = self.state.index.write().await;
        self.ensure_open()?;

        let mut to_modify = Vec::new();
        for request in &requests {
            let items = index.items_for_node(&request.node_id);
            if items.is_empty() {
                return Err(RequestError::NodeNotFound(request.node_id.to_string()).into());
            }
            let Some(parameters) = request.monitoring_parameters else {
                continue;
            };
            to_modify.extend(items.into_iter().map(|item| MonitoredItemModifyRequest {
                monitored_item_id: item.id,
                client_handle: item.handle,
                requested_parameters: parameters,
            }));
        }
        if to_modify.is_empty() {
            return Ok(());
        }
        debug!(subscription_id = self.state.id, count = to_modify.len(), "modifying monitored items");

        let resp = self
            .call(
                "modify monitored items",
                self.transport
                    .modify_monitored_items(self.config.timestamps_to_return, to_modify.clone()),
            )
            .await?;
        check_service_result("modify monitored items", &resp.header)?;
        check_result_count("modify monitored items", to_modify.len(), resp.results.len())?;
        check_item_statuses("modify monitored items", &resp.results)?;

        for (request, result) in to_modify.iter().zip(resp.results) {
            if let Some(item) = index.get_mut(request.monitored_item_id) {
                item.revised_sampling_interval = result.revised_sampling_interval;
                item.revised_queue_size = result.revised_queue_size;
            }
        }
        Ok(())
    }

    //-----------------------------------------------------------
    // Monitoring mode

    /// Sets the monitoring mode for nodes defined by their string representation
    pub async fn set_monitoring_mode_for_nodes(
        &self,
        mode: MonitoringMode,
        nodes: &[&str],
    ) -> Result<()> {
        let node_ids = NodeId::parse_all(nodes)?;
        self.set_monitoring_mode_for_node_ids(mode, &node_ids).await
    }

    pub async fn set_monitoring_mode_for_node_ids(
        &self,
        mode: MonitoringMode,
        nodes: &[NodeId],
    ) -> Result<()> {
        let index = self.state.index.write().await;
        self.ensure_open()?;

        let item_ids = resolve_nodes(&index, nodes)?;
        self.set_mode_locked(mode, item_ids).await
    }

    /// Sets the monitoring mode for items. Does not change the indices.
    pub async fn set_monitoring_mode(
        &self,
        mode: MonitoringMode,
        items: &[MonitoredItem],
    ) -> Result<()> {
        let index = self.state.index.write().await;
        self.ensure_open()?;

        let mut item_ids = Vec::with_capacity(items.len());
        for item in items {
            if index.get(item.id).is_none() {
                return Err(RequestError::ItemNotFound(item.id).into());
            }
            if !item_ids.contains(&item.id) {
                item_ids.push(item.id);
            }
        }
        self.set_mode_locked(mode, item_ids).await
    }

    async fn set_mode_locked(
        &self,
        mode: MonitoringMode,
        item_ids: Vec<u32>,
    ) -> Result<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        debug!(subscription_id = self.state.id, ?mode, count = item_ids.len(), "setting monitoring mode");

        let resp = self
            .call(
                "set monitoring mode",
                self.transport.set_monitoring_mode(mode, item_ids.clone()),
            )
            .await?;
        check_service_result("set monitoring mode", &resp.header)?;
        check_result_count("set monitoring mode", item_ids.len(), resp.results.len())?;
        check_item_statuses("set monitoring mode", &resp.results)
    }

    //-----------------------------------------------------------

    fn ensure_open(&self) -> Result<()> {
        if self.state.is_closed() {
            return Err(RequestError::SubscriptionClosed(self.state.id).into());
        }
        Ok(())
    }

    /// Runs a transport RPC bounded by the configured request timeout
    async fn call<T>(
        &self,
        operation: &'static str,
        rpc: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let timeout = self.config.request_timeout();
        match tokio::time::timeout(timeout, rpc).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::Timeout { operation, timeout }.into()),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.state.close() {
            warn!(
                subscription_id = self.state.id,
                "subscription dropped without unsubscribe; transport subscription left open"
            );
        }
    }
}

/// Resolves nodes to the ids of the items watching them, without duplicates
fn resolve_nodes(
    index: &ItemIndex,
    nodes: &[NodeId],
) -> Result<Vec<u32>> {
    let mut item_ids = Vec::new();
    for node in nodes {
        let items = index.items_for_node(node);
        if items.is_empty() {
            return Err(RequestError::NodeNotFound(node.to_string()).into());
        }
        for item in items {
            if !item_ids.contains(&item.id) {
                item_ids.push(item.id);
            }
        }
    }
    Ok(item_ids)
}

fn check_service_result(
    operation: &'static str,
    header: &ResponseHeader,
) -> Result<()> {
    if !header.service_result.is_ok() {
        return Err(RequestError::ServiceResult {
            operation,
            status: header.service_result,
        }
        .into());
    }
    Ok(())
}

fn check_result_count(
    operation: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected != actual {
        return Err(RequestError::ResponseShape {
            operation,
            expected,
            actual,
        }
        .into());
    }
    Ok(())
}

fn check_item_statuses<R: ItemResult>(
    operation: &'static str,
    results: &[R],
) -> Result<()> {
    match results.iter().position(|r| !r.status().is_ok()) {
        Some(index) => Err(RequestError::ItemStatus {
            operation,
            index,
            status: results[index].status(),
        }
        .into()),
        None => Ok(()),
    }
}
