//! Shared helpers for unit tests: logger setup and mock transport builders.
mod common;
mod mock_transport;

pub use common::*;
pub use mock_transport::*;
