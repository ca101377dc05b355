use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::Delivery;
use super::ErrorHandlerSlot;
use super::ErrorReporter;
use super::HandleAllocator;
use super::NotificationPump;
use super::Subscription;
use crate::DataChangeMessage;
use crate::Error;
use crate::MonitorConfig;
use crate::NodeId;
use crate::Result;
use crate::SubscriptionParameters;
use crate::Transport;

/// Opens subscriptions against a transport.
///
/// Owns the client handle counter and the error handler shared by every
/// subscription it creates.
pub struct NodeMonitor {
    transport: Arc<dyn Transport>,
    handles: Arc<HandleAllocator>,
    error_handler: ErrorHandlerSlot,
    config: Arc<MonitorConfig>,
}

impl NodeMonitor {
    /// Creates a monitor with the default configuration
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::build(transport, MonitorConfig::default())
    }

    pub fn with_config(
        transport: Arc<dyn Transport>,
        config: MonitorConfig,
    ) -> Result<Self> {
        Ok(Self::build(transport, config.validate()?))
    }

    fn build(
        transport: Arc<dyn Transport>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            transport,
            handles: Arc::new(HandleAllocator::new(config.initial_client_handle)),
            error_handler: ErrorHandlerSlot::default(),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Installs the handler for out-of-band delivery errors. Handlers run on
    /// their own task; replacing the handler also applies to subscriptions
    /// that are already open.
    pub fn set_error_handler<F>(
        &self,
        handler: F,
    ) where
        F: Fn(u32, Error) + Send + Sync + 'static,
    {
        self.error_handler.set(Arc::new(handler));
    }

    /// Creates a callback-based subscription with an optional list of nodes.
    ///
    /// The callback runs inline on the notification pump. If the internal
    /// buffer (`callback_buffer_len`) fills up because the callback is too
    /// slow, whole notifications are dropped and reported as
    /// [`DispatchError::SlowConsumer`](crate::DispatchError::SlowConsumer).
    pub async fn subscribe<F>(
        &self,
        cancel: CancellationToken,
        params: Option<SubscriptionParameters>,
        callback: F,
        nodes: &[&str],
    ) -> Result<Subscription>
    where
        F: FnMut(DataChangeMessage) + Send + 'static,
    {
        self.open_subscription(
            cancel,
            params,
            self.config.callback_buffer_len,
            Delivery::Callback(Box::new(callback)),
            nodes,
        )
        .await
    }

    /// Creates a channel-based subscription with an optional list of nodes.
    ///
    /// The channel should be deep enough to allow some buffering: messages
    /// that do not fit are dropped and reported as
    /// [`DispatchError::SlowConsumer`](crate::DispatchError::SlowConsumer).
    pub async fn chan_subscribe(
        &self,
        cancel: CancellationToken,
        params: Option<SubscriptionParameters>,
        sender: mpsc::Sender<DataChangeMessage>,
        nodes: &[&str],
    ) -> Result<Subscription> {
        self.open_subscription(
            cancel,
            params,
            self.config.channel_buffer_len,
            Delivery::Channel(sender),
            nodes,
        )
        .await
    }

    async fn open_subscription(
        &self,
        cancel: CancellationToken,
        params: Option<SubscriptionParameters>,
        buffer_len: usize,
        delivery: Delivery,
        nodes: &[&str],
    ) -> Result<Subscription> {
        let node_ids = NodeId::parse_all(nodes)?;
        let params = params.unwrap_or(self.config.subscription);
        params.validate()?;

        let (notify_tx, notify_rx) = mpsc::channel(buffer_len);
        let transport_sub = self.transport.subscribe(params, notify_tx).await?;
        let subscription = Subscription::new(transport_sub, self.handles.clone(), self.config.clone());
        let subscription_id = subscription.subscription_id();

        if let Err(e) = subscription.add_node_ids(&node_ids).await {
            warn!(subscription_id, error = %e, "initial add failed; releasing subscription");
            if let Err(cancel_err) = subscription.unsubscribe().await {
                error!(subscription_id, error = %cancel_err, "failed to cancel subscription");
            }
            return Err(e);
        }

        let pump = NotificationPump::new(
            subscription.state(),
            notify_rx,
            delivery,
            cancel,
            ErrorReporter::new(self.error_handler.clone(), subscription_id),
        );
        tokio::spawn(pump.run());

        info!(subscription_id, nodes = node_ids.len(), "subscription opened");
        Ok(subscription)
    }
}
