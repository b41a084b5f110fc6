//! # support-desk
//!
//! The domain toolkit for the dispatch service: a calculator, a mock
//! weather lookup, and live order-detail retrieval, exposed as a closed
//! variant set (`DeskTool`) behind the `dispatch_core::Tool` capability.
//!
//! Each tool decodes its own strongly-typed request at the edge and hands
//! back an opaque JSON payload at the registry boundary.

pub mod backend;
pub mod error;
pub mod tools;

pub use backend::{HttpOrderBackend, MockOrderBackend, OrderBackend};
pub use error::{DeskError, Result};
pub use tools::{Calculator, DeskTool, OrderDetail, Weather};
