//! Desk Tools
//!
//! The closed set of tools the dispatch service exposes. `DeskTool` is the
//! single registrable type; dispatch over the variants is exhaustive, so
//! adding a tool means adding a variant and the compiler walks the rest.

mod calculator;
mod order_detail;
mod weather;

pub use calculator::Calculator;
pub use order_detail::OrderDetail;
pub use weather::Weather;

use async_trait::async_trait;

use dispatch_core::{Result as CoreResult, Tool, ToolDefinition};

/// The fixed tool set, behind the `Tool` capability
pub enum DeskTool {
    Calculator(Calculator),
    Weather(Weather),
    OrderDetail(OrderDetail),
}

#[async_trait]
impl Tool for DeskTool {
    fn name(&self) -> &str {
        match self {
            DeskTool::Calculator(_) => Calculator::NAME,
            DeskTool::Weather(_) => Weather::NAME,
            DeskTool::OrderDetail(_) => OrderDetail::NAME,
        }
    }

    fn description(&self) -> &str {
        match self {
            DeskTool::Calculator(_) => Calculator::DESCRIPTION,
            DeskTool::Weather(_) => Weather::DESCRIPTION,
            DeskTool::OrderDetail(_) => OrderDetail::DESCRIPTION,
        }
    }

    fn definition(&self) -> ToolDefinition {
        match self {
            DeskTool::Calculator(_) => Calculator::definition(),
            DeskTool::Weather(_) => Weather::definition(),
            DeskTool::OrderDetail(_) => OrderDetail::definition(),
        }
    }

    async fn execute(&self, args: serde_json::Value) -> CoreResult<serde_json::Value> {
        let value = match self {
            DeskTool::Calculator(tool) => tool.run(args)?,
            DeskTool::Weather(tool) => tool.run(args)?,
            DeskTool::OrderDetail(tool) => tool.run(args).await?,
        };
        Ok(value)
    }
}
