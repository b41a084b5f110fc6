//! Intent Classification
//!
//! The first AI call classifies the user's purpose. The reply is expected to
//! be a JSON object `{intent, confidence, reasoning}`; anything else means
//! the intent could not be resolved and the route asks the user to clarify.

use serde::Deserialize;

use crate::error::{DispatchError, Result};

/// Classified purpose of a user message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// User wants to look up or diagnose an order
    OrderDiagnosis,
    /// General question answered from a knowledge base
    KnowledgeQa,
    /// Classifier could not tell
    Unknown,
}

/// Raw classification payload as produced by the model
///
/// `confidence` arrives as a number or a quoted string depending on the
/// model, so it stays untyped; only `intent` is load-bearing.
#[derive(Debug, Deserialize)]
pub struct IntentSignal {
    #[serde(default)]
    pub intent: String,

    #[serde(default)]
    pub confidence: serde_json::Value,

    #[serde(default)]
    pub reasoning: String,
}

impl Intent {
    /// Parse the classifier's reply.
    ///
    /// Unparsable content or an empty intent field fails with
    /// `IntentUnresolved`; an explicit `"unknown"` (or any unrecognized
    /// label) parses to `Intent::Unknown` and the router rejects it there.
    pub fn parse(reply: &str) -> Result<Self> {
        let signal: IntentSignal = serde_json::from_str(reply).map_err(|e| {
            tracing::debug!(error = %e, "failed to parse intent JSON");
            DispatchError::IntentUnresolved
        })?;

        if signal.intent.is_empty() {
            return Err(DispatchError::IntentUnresolved);
        }

        tracing::debug!(
            intent = %signal.intent,
            reasoning = %signal.reasoning,
            "classified user intent"
        );

        Ok(match signal.intent.as_str() {
            "order_diagnosis" => Intent::OrderDiagnosis,
            "knowledge_qa" => Intent::KnowledgeQa,
            _ => Intent::Unknown,
        })
    }
}

/// Build the intent-classification prompt for the given user input
pub fn classification_prompt(user_input: &str) -> String {
    CLASSIFICATION_PROMPT.replace("{user_input}", user_input)
}

const CLASSIFICATION_PROMPT: &str = r#"请分析以下用户输入，判断用户的意图类型。

用户输入：{user_input}

意图类型说明：
1. order_diagnosis - 订单诊断：用户想要查询、诊断或了解订单相关信息
2. knowledge_qa - 知识问答：用户想要进行一般性问答或获取知识信息

- 当用户意图不够清晰且不匹配 knowledge_qa 以外意图时，使用 knowledge_qa
- 当用户意图非常不清晰时使用 unknown

请只返回以下格式的JSON：
{
    "intent": "order_diagnosis" | "knowledge_qa" | "unknown",
    "confidence": 0.0-1.0,
    "reasoning": "判断理由"
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_intents() {
        let reply = r#"{"intent": "order_diagnosis", "confidence": 0.92, "reasoning": "order id present"}"#;
        assert_eq!(Intent::parse(reply).unwrap(), Intent::OrderDiagnosis);

        let reply = r#"{"intent": "knowledge_qa", "confidence": "0.7", "reasoning": ""}"#;
        assert_eq!(Intent::parse(reply).unwrap(), Intent::KnowledgeQa);
    }

    #[test]
    fn test_parse_unknown_label() {
        let reply = r#"{"intent": "unknown", "confidence": 0.1, "reasoning": "unclear"}"#;
        assert_eq!(Intent::parse(reply).unwrap(), Intent::Unknown);

        let reply = r#"{"intent": "order_cancellation", "confidence": 0.5, "reasoning": ""}"#;
        assert_eq!(Intent::parse(reply).unwrap(), Intent::Unknown);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Intent::parse("I think the user wants the weather."),
            Err(DispatchError::IntentUnresolved)
        ));
        assert!(matches!(
            Intent::parse(r#"{"confidence": 0.9}"#),
            Err(DispatchError::IntentUnresolved)
        ));
        assert!(matches!(
            Intent::parse(""),
            Err(DispatchError::IntentUnresolved)
        ));
    }

    #[test]
    fn test_prompt_templates_user_input() {
        let prompt = classification_prompt("我的订单怎么了");
        assert!(prompt.contains("用户输入：我的订单怎么了"));
        assert!(!prompt.contains("{user_input}"));
    }
}
