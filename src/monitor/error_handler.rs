use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::Error;

/// Callback for out-of-band delivery problems. Receives the id of the
/// subscription the problem was detected on.
pub type ErrorHandler = Arc<dyn Fn(u32, Error) + Send + Sync>;

/// Registry-wide handler slot, shared with every subscription the registry
/// opens. Replacing the handler affects existing subscriptions too.
#[derive(Clone, Default)]
pub(crate) struct ErrorHandlerSlot {
    inner: Arc<RwLock<Option<ErrorHandler>>>,
}

impl ErrorHandlerSlot {
    pub(crate) fn set(
        &self,
        handler: ErrorHandler,
    ) {
        *self.inner.write() = Some(handler);
    }

    pub(crate) fn get(&self) -> Option<ErrorHandler> {
        self.inner.read().clone()
    }
}

/// Per-subscription view on the handler slot.
#[derive(Clone)]
pub(crate) struct ErrorReporter {
    slot: ErrorHandlerSlot,
    subscription_id: u32,
}

impl ErrorReporter {
    pub(crate) fn new(
        slot: ErrorHandlerSlot,
        subscription_id: u32,
    ) -> Self {
        Self {
            slot,
            subscription_id,
        }
    }

    /// Fire-and-forget: the handler runs on its own task and its completion
    /// is not tracked.
    pub(crate) fn report(
        &self,
        error: impl Into<Error>,
    ) {
        let error = error.into();
        warn!(subscription_id = self.subscription_id, %error, "subscription delivery error");

        let Some(handler) = self.slot.get() else {
            return;
        };
        let subscription_id = self.subscription_id;
        tokio::spawn(async move {
            handler(subscription_id, error);
        });
    }
}
