//! Order Detail Tool
//!
//! Retrieves order detail from the configured backend and returns the
//! parsed payload. Backend failures propagate as tool errors instead of
//! degrading to an empty result.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use dispatch_core::ToolDefinition;

use crate::backend::OrderBackend;
use crate::error::{DeskError, Result};

/// Order-detail retrieval tool
pub struct OrderDetail {
    backend: Arc<dyn OrderBackend>,
}

#[derive(Debug, Deserialize)]
struct OrderDetailRequest {
    number: String,
}

impl OrderDetail {
    pub const NAME: &'static str = "order_detail";
    pub const DESCRIPTION: &'static str = "获取直连天下订单详情";

    pub fn new(backend: Arc<dyn OrderBackend>) -> Self {
        Self { backend }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::function(
            Self::NAME,
            Self::DESCRIPTION,
            json!({
                "type": "object",
                "properties": {
                    "number": {
                        "type": "string",
                        "description": "订单编号/流水号"
                    }
                },
                "required": ["number"]
            }),
        )
    }

    pub async fn run(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let req: OrderDetailRequest = serde_json::from_value(args).map_err(|e| {
            DeskError::InvalidArgument(format!("invalid order detail request: {e}"))
        })?;

        if req.number.is_empty() {
            return Err(DeskError::InvalidArgument("number is required".into()));
        }

        self.backend.fetch(&req.number).await
    }
}
