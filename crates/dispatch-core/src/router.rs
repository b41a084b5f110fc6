//! Router
//!
//! The orchestration core: classify intent, branch, let the AI request tool
//! calls, execute them through the registry, and merge results into the
//! response envelope. Immutable after construction; one logical task per
//! request.

use std::sync::Arc;
use std::time::Duration;

use crate::caller::{self, KnowledgeBase};
use crate::client::{AiClient, Completion};
use crate::envelope::{ChatRequest, ChatResponse};
use crate::error::{DispatchError, Result};
use crate::intent::{self, Intent};
use crate::message::Message;
use crate::tool::{Tool, ToolCall, ToolDefinition, ToolRegistry};

/// Name the order-diagnosis branch expects the order tool to be registered
/// under.
pub const ORDER_DETAIL_TOOL: &str = "order_detail";

/// Orchestration strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteStrategy {
    /// Canonical: classify intent first, then branch
    IntentBranching,

    /// Flat tool loop without classification: one AI call with the full
    /// schema set, execute requested tools, one synthesis call
    SinglePass,
}

/// Router configuration, immutable after construction
#[derive(Clone, Debug)]
pub struct RouterConfig {
    pub strategy: RouteStrategy,

    /// Deadline applied to each individual AI call; `None` disables it
    pub ai_timeout: Option<Duration>,

    /// Fire a warm-up call at the order backend before the order-diagnosis
    /// AI call. The result is discarded.
    pub warm_order_backend: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strategy: RouteStrategy::IntentBranching,
            ai_timeout: Some(Duration::from_secs(30)),
            warm_order_backend: false,
        }
    }
}

/// The router service
pub struct Router<T: Tool> {
    ai: Arc<dyn AiClient>,
    tools: Arc<ToolRegistry<T>>,
    knowledge: Option<Arc<dyn KnowledgeBase>>,
    config: RouterConfig,
}

impl<T: Tool> Router<T> {
    pub fn new(
        ai: Arc<dyn AiClient>,
        tools: Arc<ToolRegistry<T>>,
        knowledge: Option<Arc<dyn KnowledgeBase>>,
        config: RouterConfig,
    ) -> Self {
        Self {
            ai,
            tools,
            knowledge,
            config,
        }
    }

    /// Create with default configuration and no knowledge service
    pub fn with_defaults(ai: Arc<dyn AiClient>, tools: Arc<ToolRegistry<T>>) -> Self {
        Self::new(ai, tools, None, RouterConfig::default())
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry<T> {
        &self.tools
    }

    /// Route one request to a final response.
    ///
    /// Only AI-call failure and intent resolution abort the route; tool
    /// failures are contained to the failing call's result payload.
    pub async fn route(&self, req: &ChatRequest) -> Result<ChatResponse> {
        match self.config.strategy {
            RouteStrategy::IntentBranching => self.route_by_intent(req).await,
            RouteStrategy::SinglePass => self.route_single_pass(req).await,
        }
    }

    /// One AI call under the configured deadline
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Completion> {
        match self.config.ai_timeout {
            Some(limit) => tokio::time::timeout(limit, self.ai.chat(messages, tools))
                .await
                .map_err(|_| DispatchError::Timeout {
                    secs: limit.as_secs(),
                })?,
            None => self.ai.chat(messages, tools).await,
        }
    }

    async fn route_by_intent(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let messages = vec![
            Message::assistant(intent::classification_prompt(&req.user_input)),
            Message::user(&req.user_input),
        ];

        // First AI call: classification only, no tool schemas.
        let classification = self.chat(&messages, &[]).await?;

        match Intent::parse(&classification.message)? {
            Intent::OrderDiagnosis => self.handle_order_diagnosis(req, messages).await,
            Intent::KnowledgeQa => self.handle_knowledge_qa(req).await,
            Intent::Unknown => Err(DispatchError::IntentUnresolved),
        }
    }

    /// Order-diagnosis branch.
    ///
    /// Contract: this branch reports executed tool results directly and does
    /// not perform a synthesis call.
    async fn handle_order_diagnosis(
        &self,
        req: &ChatRequest,
        messages: Vec<Message>,
    ) -> Result<ChatResponse> {
        let order_tool = self
            .tools
            .get(ORDER_DETAIL_TOOL)
            .ok_or_else(|| DispatchError::ToolNotFound(ORDER_DETAIL_TOOL.into()))?;

        if self.config.warm_order_backend {
            // Eager warm-up with empty arguments; outcome deliberately ignored.
            if let Err(e) = order_tool.execute(serde_json::json!({})).await {
                tracing::debug!(error = %e, "order backend warm-up failed");
            }
        }

        let definitions = self.tools.definitions(&req.caller);
        let completion = self.chat(&messages, &definitions).await?;

        if completion.tool_calls.is_empty() {
            return Ok(ChatResponse::success(completion.message));
        }

        let executed = self.tools.execute_batch(completion.tool_calls).await;

        tracing::info!(
            caller = %req.caller,
            tools = executed.len(),
            "order diagnosis executed tool calls"
        );

        let data = serde_json::to_value(&executed)?;
        Ok(ChatResponse::success(completion.message).with_data(data))
    }

    /// Knowledge-QA branch: delegate to the retrieval collaborator selected
    /// by the caller mapping.
    async fn handle_knowledge_qa(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let knowledge = self
            .knowledge
            .as_ref()
            .ok_or_else(|| DispatchError::Knowledge("no knowledge service configured".into()))?;

        let knowledge_id = caller::knowledge_base_for(&req.caller).ok_or_else(|| {
            DispatchError::Knowledge(format!("no knowledge base mapped for caller {}", req.caller))
        })?;

        let answer = knowledge.query(&knowledge_id, &req.user_input).await?;
        Ok(ChatResponse::success(answer))
    }

    /// Flat tool loop: AI call with the full schema set, batch execution,
    /// then one synthesis call over the extended history.
    async fn route_single_pass(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let mut messages = vec![Message::user(&req.user_input)];
        let definitions = self.tools.definitions(&req.caller);

        let completion = self.chat(&messages, &definitions).await?;

        if completion.tool_calls.is_empty() {
            return Ok(ChatResponse::success(completion.message));
        }

        let executed = self.tools.execute_batch(completion.tool_calls).await;

        // The synthesis history strictly extends the first-call history:
        // one assistant turn, then one tool turn per executed call, in
        // request order.
        messages.push(Message::assistant(&completion.message));
        for call in &executed {
            messages.push(tool_turn(call));
        }

        let synthesis = self.chat(&messages, &[]).await?;

        tracing::info!(
            caller = %req.caller,
            tools = executed.len(),
            "single-pass route completed"
        );

        let data = serde_json::to_value(&executed)?;
        Ok(ChatResponse::success(synthesis.message).with_data(data))
    }
}

/// Render one executed call as a tool turn
fn tool_turn(call: &ToolCall) -> Message {
    let payload = call
        .result
        .as_ref()
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    Message::tool(format!("Tool {} result: {}", call.name, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ResponseStatus;
    use crate::message::Role;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// AI client scripted with queued completions; records every call's
    /// history and schema count.
    struct ScriptedAi {
        replies: Mutex<VecDeque<Completion>>,
        calls: Mutex<Vec<(Vec<Message>, usize)>>,
    }

    impl ScriptedAi {
        fn new(replies: Vec<Completion>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn recorded_calls(&self) -> Vec<(Vec<Message>, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AiClient for ScriptedAi {
        async fn chat(
            &self,
            messages: &[Message],
            tools: &[ToolDefinition],
        ) -> Result<Completion> {
            self.calls
                .lock()
                .unwrap()
                .push((messages.to_vec(), tools.len()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| DispatchError::Upstream("script exhausted".into()))
        }
    }

    /// Test tool that returns a fixed payload
    struct FixedTool {
        name: &'static str,
        reply: serde_json::Value,
    }

    #[async_trait]
    impl Tool for FixedTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "fixed test tool"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::function(self.name, self.description(), json!({"type": "object"}))
        }

        async fn execute(&self, _args: serde_json::Value) -> Result<serde_json::Value> {
            Ok(self.reply.clone())
        }
    }

    struct StubKnowledge;

    #[async_trait]
    impl KnowledgeBase for StubKnowledge {
        async fn query(
            &self,
            knowledge_id: &crate::caller::KnowledgeId,
            question: &str,
        ) -> Result<String> {
            Ok(format!("[{knowledge_id}] answer to: {question}"))
        }
    }

    fn registry(tools: Vec<FixedTool>) -> Arc<ToolRegistry<FixedTool>> {
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register(tool);
        }
        Arc::new(registry)
    }

    fn order_tool() -> FixedTool {
        FixedTool {
            name: ORDER_DETAIL_TOOL,
            reply: json!({"order": {"number": "A1", "state": "paid"}}),
        }
    }

    fn intent_reply(intent: &str) -> Completion {
        Completion::text(format!(
            r#"{{"intent": "{intent}", "confidence": 0.9, "reasoning": "test"}}"#
        ))
    }

    fn request(input: &str) -> ChatRequest {
        ChatRequest::new(input, "zltx")
    }

    fn single_pass_router(
        ai: Arc<ScriptedAi>,
        tools: Arc<ToolRegistry<FixedTool>>,
    ) -> Router<FixedTool> {
        Router::new(
            ai,
            tools,
            None,
            RouterConfig {
                strategy: RouteStrategy::SinglePass,
                ..RouterConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_single_pass_without_tool_calls_returns_verbatim() {
        let ai = Arc::new(ScriptedAi::new(vec![Completion::text("just an answer")]));
        let router = single_pass_router(ai.clone(), registry(vec![order_tool()]));

        let resp = router.route(&request("hello")).await.unwrap();
        assert_eq!(resp.status, ResponseStatus::Success);
        assert_eq!(resp.message, "just an answer");
        assert!(resp.data.is_none());

        // Exactly one AI call, with the full schema set offered.
        let calls = ai.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 1);
    }

    #[tokio::test]
    async fn test_single_pass_tool_loop_synthesizes() {
        let ai = Arc::new(ScriptedAi::new(vec![
            Completion::with_tool_calls(
                "let me calculate",
                vec![ToolCall::new(
                    "call_0",
                    "calculate",
                    json!({"operation": "power", "a": 2, "b": 3}),
                )],
            ),
            Completion::text("2的3次方是8"),
        ]));
        let tools = registry(vec![FixedTool {
            name: "calculate",
            reply: json!({"result": 8.0, "expression": "2.00 ^ 3.00 = 8.00"}),
        }]);
        let router = single_pass_router(ai.clone(), tools);

        let resp = router.route(&request("2的3次方是多少")).await.unwrap();
        assert_eq!(resp.status, ResponseStatus::Success);
        assert_eq!(resp.message, "2的3次方是8");

        // Executed calls are merged into data with results attached.
        let data = resp.data.unwrap();
        assert_eq!(data[0]["name"], "calculate");
        assert_eq!(data[0]["result"]["result"], 8.0);

        // Synthesis call: no schemas, history extended by one assistant turn
        // plus one tool turn carrying the encoded result.
        let calls = ai.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1, 0);
        let history = &calls[1].0;
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[2].role, Role::Tool);
        assert!(history[2].content.starts_with("Tool calculate result: "));
        assert!(history[2].content.contains("8.00"));
    }

    #[tokio::test]
    async fn test_single_pass_tool_turns_follow_request_order() {
        let ai = Arc::new(ScriptedAi::new(vec![
            Completion::with_tool_calls(
                "two lookups",
                vec![
                    ToolCall::new("call_0", "first", json!({})),
                    ToolCall::new("call_1", "second", json!({})),
                ],
            ),
            Completion::text("done"),
        ]));
        let tools = registry(vec![
            FixedTool {
                name: "first",
                reply: json!({"n": 1}),
            },
            FixedTool {
                name: "second",
                reply: json!({"n": 2}),
            },
        ]);
        let router = single_pass_router(ai.clone(), tools);

        router.route(&request("both please")).await.unwrap();

        let calls = ai.recorded_calls();
        let history = &calls[1].0;
        assert!(history[2].content.starts_with("Tool first result:"));
        assert!(history[3].content.starts_with("Tool second result:"));
    }

    #[tokio::test]
    async fn test_unparsable_classification_fails_route() {
        let ai = Arc::new(ScriptedAi::new(vec![Completion::text(
            "the user probably wants the weather",
        )]));
        let router = Router::with_defaults(ai, registry(vec![order_tool()]));

        let err = router.route(&request("嗯？")).await.unwrap_err();
        assert!(matches!(err, DispatchError::IntentUnresolved));
        assert!(err.user_message().contains("请明确"));
    }

    #[tokio::test]
    async fn test_unknown_intent_fails_route() {
        let ai = Arc::new(ScriptedAi::new(vec![intent_reply("unknown")]));
        let router = Router::with_defaults(ai, registry(vec![order_tool()]));

        let err = router.route(&request("asdf")).await.unwrap_err();
        assert!(matches!(err, DispatchError::IntentUnresolved));
    }

    #[tokio::test]
    async fn test_order_diagnosis_executes_tools_without_synthesis() {
        let ai = Arc::new(ScriptedAi::new(vec![
            intent_reply("order_diagnosis"),
            Completion::with_tool_calls(
                "looking up the order",
                vec![ToolCall::new(
                    "call_0",
                    ORDER_DETAIL_TOOL,
                    json!({"number": "A1"}),
                )],
            ),
        ]));
        let router = Router::with_defaults(ai.clone(), registry(vec![order_tool()]));

        let resp = router.route(&request("订单A1怎么了")).await.unwrap();
        assert_eq!(resp.status, ResponseStatus::Success);

        let data = resp.data.unwrap();
        assert_eq!(data[0]["result"]["order"]["state"], "paid");

        // Two AI calls only: classification (no schemas) + tool selection.
        // No third synthesis call.
        let calls = ai.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, 0);
        assert_eq!(calls[1].1, 1);
    }

    #[tokio::test]
    async fn test_order_diagnosis_without_tool_calls_returns_message() {
        let ai = Arc::new(ScriptedAi::new(vec![
            intent_reply("order_diagnosis"),
            Completion::text("请提供订单编号"),
        ]));
        let router = Router::with_defaults(ai, registry(vec![order_tool()]));

        let resp = router.route(&request("查订单")).await.unwrap();
        assert_eq!(resp.message, "请提供订单编号");
        assert!(resp.data.is_none());
    }

    #[tokio::test]
    async fn test_order_diagnosis_requires_order_tool() {
        let ai = Arc::new(ScriptedAi::new(vec![intent_reply("order_diagnosis")]));
        let router = Router::with_defaults(ai, registry(vec![]));

        let err = router.route(&request("查订单A1")).await.unwrap_err();
        assert!(matches!(err, DispatchError::ToolNotFound(name) if name == ORDER_DETAIL_TOOL));
    }

    #[tokio::test]
    async fn test_knowledge_qa_delegates_by_caller_mapping() {
        let ai = Arc::new(ScriptedAi::new(vec![intent_reply("knowledge_qa")]));
        let router = Router::new(
            ai,
            registry(vec![order_tool()]),
            Some(Arc::new(StubKnowledge)),
            RouterConfig::default(),
        );

        let resp = router.route(&request("发票怎么开")).await.unwrap();
        assert_eq!(resp.status, ResponseStatus::Success);
        assert!(resp.message.contains("kb-00000001"));
        assert!(resp.message.contains("发票怎么开"));
    }

    #[tokio::test]
    async fn test_knowledge_qa_unmapped_caller_fails() {
        let ai = Arc::new(ScriptedAi::new(vec![intent_reply("knowledge_qa")]));
        let router = Router::new(
            ai,
            registry(vec![order_tool()]),
            Some(Arc::new(StubKnowledge)),
            RouterConfig::default(),
        );

        let err = router
            .route(&ChatRequest::new("发票怎么开", "hyt"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Knowledge(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_aborts_route() {
        let ai = Arc::new(ScriptedAi::new(vec![]));
        let router = Router::with_defaults(ai, registry(vec![order_tool()]));

        let err = router.route(&request("hi")).await.unwrap_err();
        assert!(matches!(err, DispatchError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_ai_call_deadline_enforced() {
        struct HangingAi;

        #[async_trait]
        impl AiClient for HangingAi {
            async fn chat(
                &self,
                _messages: &[Message],
                _tools: &[ToolDefinition],
            ) -> Result<Completion> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Completion::text("too late"))
            }
        }

        let router = Router::new(
            Arc::new(HangingAi),
            registry(vec![order_tool()]),
            None,
            RouterConfig {
                ai_timeout: Some(Duration::from_millis(20)),
                ..RouterConfig::default()
            },
        );

        let err = router.route(&request("hi")).await.unwrap_err();
        assert!(matches!(err, DispatchError::Timeout { .. }));
    }
}
