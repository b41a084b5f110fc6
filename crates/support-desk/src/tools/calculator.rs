//! Calculator Tool
//!
//! Two-operand arithmetic with a human-readable expression string.

use serde::{Deserialize, Serialize};
use serde_json::json;

use dispatch_core::ToolDefinition;

use crate::error::{DeskError, Result};

/// Calculator tool
#[derive(Clone, Copy, Debug, Default)]
pub struct Calculator;

/// Supported operations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    /// Glyph used in the rendered expression
    fn glyph(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
            Operation::Power => "^",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalculateRequest {
    operation: Operation,
    a: f64,
    b: f64,
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    operation: Operation,
    a: f64,
    b: f64,
    result: f64,
    expression: String,
}

impl Calculator {
    pub const NAME: &'static str = "calculate";
    pub const DESCRIPTION: &'static str = "执行基本的数学运算，支持加减乘除和幂运算";

    pub fn definition() -> ToolDefinition {
        ToolDefinition::function(
            Self::NAME,
            Self::DESCRIPTION,
            json!({
                "type": "object",
                "properties": {
                    "operation": {
                        "type": "string",
                        "description": "运算类型",
                        "enum": ["add", "subtract", "multiply", "divide", "power"]
                    },
                    "a": {
                        "type": "number",
                        "description": "第一个数字"
                    },
                    "b": {
                        "type": "number",
                        "description": "第二个数字"
                    }
                },
                "required": ["operation", "a", "b"]
            }),
        )
    }

    pub fn run(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let req: CalculateRequest = serde_json::from_value(args)
            .map_err(|e| DeskError::InvalidArgument(format!("invalid calculate request: {e}")))?;

        let result = match req.operation {
            Operation::Add => req.a + req.b,
            Operation::Subtract => req.a - req.b,
            Operation::Multiply => req.a * req.b,
            Operation::Divide => {
                if req.b == 0.0 {
                    return Err(DeskError::DivisionByZero);
                }
                req.a / req.b
            }
            Operation::Power => req.a.powf(req.b),
        };

        if !result.is_finite() {
            return Err(DeskError::InvalidResult);
        }

        let expression = format!(
            "{:.2} {} {:.2} = {:.2}",
            req.a,
            req.operation.glyph(),
            req.b,
            result
        );

        Ok(serde_json::to_value(CalculateResponse {
            operation: req.operation,
            a: req.a,
            b: req.b,
            result,
            expression,
        })?)
    }
}
