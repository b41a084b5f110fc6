//! Mock Order Backend
//!
//! For testing and demo purposes. Serves canned order payloads.

use std::collections::HashMap;

use async_trait::async_trait;

use super::OrderBackend;
use crate::error::{DeskError, Result};

/// Mock order backend with canned payloads keyed by order number
#[derive(Default)]
pub struct MockOrderBackend {
    orders: HashMap<String, serde_json::Value>,
}

impl MockOrderBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned order payload
    pub fn with_order(mut self, number: impl Into<String>, payload: serde_json::Value) -> Self {
        self.orders.insert(number.into(), payload);
        self
    }
}

#[async_trait]
impl OrderBackend for MockOrderBackend {
    async fn fetch(&self, number: &str) -> Result<serde_json::Value> {
        self.orders
            .get(number)
            .cloned()
            .ok_or_else(|| DeskError::Backend(format!("order not found: {number}")))
    }

    fn name(&self) -> &str {
        "MockOrderBackend"
    }
}
