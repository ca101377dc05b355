//! Notification pump: the single dispatch loop of a subscription.
//!
//! Converts raw transport notifications into [`DataChangeMessage`]s and hands
//! them to the consumer without ever blocking on it. Records that cannot be
//! delivered are counted as dropped and reported through the error handler.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;

use super::ErrorReporter;
use super::SubscriptionState;
use crate::DataChangeMessage;
use crate::DataChangeNotification;
use crate::DispatchError;
use crate::NotificationData;
use crate::PublishNotification;

/// Callback consumer, invoked inline on the pump task.
///
/// A panicking callback takes the pump down with it.
pub type MessageHandler = Box<dyn FnMut(DataChangeMessage) + Send>;

pub(crate) enum Delivery {
    /// Caller-owned bounded channel; sends never wait
    Channel(mpsc::Sender<DataChangeMessage>),
    Callback(MessageHandler),
}

pub(crate) struct NotificationPump {
    state: Arc<SubscriptionState>,
    notifications: mpsc::Receiver<PublishNotification>,
    delivery: Delivery,
    cancel: CancellationToken,
    errors: ErrorReporter,
}

impl NotificationPump {
    pub(crate) fn new(
        state: Arc<SubscriptionState>,
        notifications: mpsc::Receiver<PublishNotification>,
        delivery: Delivery,
        cancel: CancellationToken,
        errors: ErrorReporter,
    ) -> Self {
        Self {
            state,
            notifications,
            delivery,
            cancel,
            errors,
        }
    }

    /// Runs until the caller cancels, the subscription is closed or the
    /// notification stream ends. Buffered notifications are not drained.
    pub(crate) async fn run(mut self) {
        let subscription_id = self.state.id;
        let cancel = self.cancel.clone();
        let closed = self.state.close_signal.clone();
        debug!(subscription_id, "notification pump started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(subscription_id, "notification pump cancelled");
                    return;
                }
                _ = closed.cancelled() => {
                    debug!(subscription_id, "subscription closed; notification pump stopped");
                    return;
                }
                notification = self.notifications.recv() => {
                    let Some(notification) = notification else {
                        debug!(subscription_id, "notification stream ended");
                        return;
                    };
                    self.handle_notification(notification).await;
                }
            }
        }
    }

    pub(super) async fn handle_notification(
        &mut self,
        notification: PublishNotification,
    ) {
        let data = match notification.data {
            Ok(data) => data,
            Err(e) => {
                self.errors.report(e);
                return;
            }
        };

        if notification.subscription_id != self.state.id {
            self.errors.report(DispatchError::ProtocolMismatch {
                expected: self.state.id,
                actual: notification.subscription_id,
            });
            return;
        }

        match data {
            NotificationData::DataChange(change) => self.dispatch_data_change(change).await,
            other => self
                .errors
                .report(DispatchError::UnsupportedNotification(other.kind())),
        }
    }

    async fn dispatch_data_change(
        &mut self,
        change: DataChangeNotification,
    ) {
        // Callback consumers run inline, so a full internal buffer means the
        // consumer is behind: the whole notification is discarded.
        if matches!(self.delivery, Delivery::Callback(_)) && self.buffer_full() {
            self.state
                .dropped
                .fetch_add(change.monitored_items.len() as u64, Ordering::Relaxed);
            self.errors.report(DispatchError::SlowConsumer);
            return;
        }

        for record in change.monitored_items {
            // a mutation may hold the write lock across its RPC; stop waiting
            // once the subscription is cancelled or closed
            let node_id = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return,
                _ = self.state.close_signal.cancelled() => return,
                index = self.state.index.read() => index.node_for_handle(record.client_handle).cloned(),
            };
            if self.stopped() {
                return;
            }

            let message = match node_id {
                Some(node_id) => DataChangeMessage::Change {
                    node_id,
                    value: record.value,
                },
                None => DataChangeMessage::Error(
                    DispatchError::HandleNotFound(record.client_handle).into(),
                ),
            };
            trace!(subscription_id = self.state.id, handle = record.client_handle, "dispatching change");
            self.deliver(message);
        }
    }

    fn deliver(
        &mut self,
        message: DataChangeMessage,
    ) {
        match &mut self.delivery {
            Delivery::Channel(tx) => match tx.try_send(message) {
                Ok(()) => {
                    self.state.delivered.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Full(_)) => {
                    self.state.dropped.fetch_add(1, Ordering::Relaxed);
                    self.errors.report(DispatchError::SlowConsumer);
                }
                Err(TrySendError::Closed(_)) => {
                    self.state.dropped.fetch_add(1, Ordering::Relaxed);
                    self.errors.report(DispatchError::ConsumerClosed);
                }
            },
            Delivery::Callback(handler) => {
                handler(message);
                self.state.delivered.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.state.is_closed()
    }

    fn buffer_full(&self) -> bool {
        self.notifications.len() >= self.notifications.max_capacity()
    }
}
