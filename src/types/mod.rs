//! Value types shared by the registry, the subscriptions and the transport:
//! node identity, watch requests, confirmed items, change messages and the
//! wire-level request/response shapes.

mod data_value;
mod item;
mod message;
mod node_id;
mod notification;
mod service;

pub use data_value::*;
pub use item::*;
pub use message::*;
pub use node_id::*;
pub use notification::*;
pub use service::*;

#[cfg(test)]
mod types_test;
