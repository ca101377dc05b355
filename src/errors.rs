//! Node Monitor Error Hierarchy
//!
//! Errors are grouped by where they surface:
//! - [`DispatchError`]: raised inside the notification pump and reported
//!   out-of-band through the registry error handler (or, for
//!   [`DispatchError::HandleNotFound`], delivered as the message itself).
//! - [`RequestError`]: raised by batch mutation calls and returned
//!   synchronously to the caller.
//! - [`TransportError`]: opaque failures coming from the session/transport
//!   collaborator.

use std::time::Duration;

use config::ConfigError;

use crate::StatusCode;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failures reported by the underlying session/transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Out-of-band delivery problems detected by the notification pump
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Batch mutation failures (add/remove/modify/set-mode)
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Malformed node identifier string forms
    #[error(transparent)]
    NodeId(#[from] NodeIdError),

    /// Configuration loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Opaque failure raised by the transport collaborator, either on the
/// notification stream or as the outcome of an RPC.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
    pub status: Option<StatusCode>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// A notification arrived for a different subscription than the one
    /// whose pump received it
    #[error("notification subscription id {actual} does not match subscription id {expected}")]
    ProtocolMismatch { expected: u32, actual: u32 },

    /// Consumer could not keep up; messages were dropped
    #[error("slow consumer: messages dropped")]
    SlowConsumer,

    /// No node is registered under the client handle of a change record
    #[error("client handle {0} not found")]
    HandleNotFound(u32),

    /// Notification payload is not a data change notification
    #[error("unsupported notification type: {0}")]
    UnsupportedNotification(&'static str),

    /// The consumer side of a channel subscription has been dropped
    #[error("consumer channel closed")]
    ConsumerClosed,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// Non-good top-level service result
    #[error("{operation} failed with service result {status}")]
    ServiceResult {
        operation: &'static str,
        status: StatusCode,
    },

    /// Per-item result count differs from the number of requested items
    #[error("{operation} response length mismatch: expected {expected} results, got {actual}")]
    ResponseShape {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Non-good status for an individual item of the batch
    #[error("{operation} item {index} failed with status {status}")]
    ItemStatus {
        operation: &'static str,
        index: usize,
        status: StatusCode,
    },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("monitored item not found: {0}")]
    ItemNotFound(u32),

    #[error("subscription {0} is closed")]
    SubscriptionClosed(u32),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeIdError {
    #[error("empty node id")]
    Empty,

    #[error("invalid namespace in node id: {0}")]
    InvalidNamespace(String),

    #[error("invalid node id format: {0}")]
    InvalidFormat(String),

    #[error("invalid numeric identifier: {0}")]
    InvalidNumeric(String),

    #[error("invalid guid identifier: {0}")]
    InvalidGuid(String),

    #[error("invalid opaque identifier: {0}")]
    InvalidOpaque(String),
}
