//! Subscription notification-dispatch engine.
//!
//! Given a publish/subscribe session to a remote data source (the
//! [`Transport`]), a [`NodeMonitor`] opens [`Subscription`]s, tracks which
//! nodes each one watches, maps the per-item client handles carried by raw
//! notifications back to node identities and delivers
//! [`DataChangeMessage`]s to a callback or a bounded channel. Delivery never
//! blocks on a slow consumer: records that do not fit are dropped, counted
//! and reported through the registry error handler.

mod config;
mod errors;
mod monitor;
mod transport;
mod types;

pub use crate::config::*;
pub use errors::*;
pub use monitor::*;
pub use transport::*;
pub use types::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
