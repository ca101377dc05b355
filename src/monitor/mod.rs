//! Monitor registry, subscriptions and the notification pump.
//!
//! Data flows `NodeMonitor -> Subscription (one-to-many) -> NotificationPump
//! (one per subscription) -> consumer`. Mutations flow the other way:
//! caller -> `Subscription` -> transport RPC -> index update.

mod error_handler;
mod handle_allocator;
mod item_index;
mod node_monitor;
mod pump;
mod subscription;

pub use error_handler::ErrorHandler;
pub(crate) use error_handler::ErrorHandlerSlot;
pub(crate) use error_handler::ErrorReporter;
pub use handle_allocator::HandleAllocator;
pub(crate) use item_index::ItemIndex;
pub use node_monitor::NodeMonitor;
pub(crate) use pump::Delivery;
pub use pump::MessageHandler;
pub(crate) use pump::NotificationPump;
pub use subscription::Subscription;
pub(crate) use subscription::SubscriptionState;

#[cfg(test)]
mod item_index_test;
