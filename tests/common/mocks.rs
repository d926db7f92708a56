//! Mock implementations for testing.
//!
//! Scripted LLM clients shared across the integration tests. Every call is
//! recorded so tests can assert on what the hub asked the model.

use async_trait::async_trait;
use medhub::agents::{ConversationController, DelegationClient, RoleRegistry};
use medhub::llm::{GenerationOptions, LLMClient, LLMResponse};
use medhub::types::{AppError, Result, ToolCall, ToolDefinition};
use medhub::{AppState, HubConfig};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// One request the hub made to the model
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    /// Names of declared capabilities (routing calls only)
    pub tools: Vec<String>,
    /// `None` for routing calls
    pub web_search: Option<bool>,
}

impl RecordedCall {
    pub fn is_routing(&self) -> bool {
        self.web_search.is_none()
    }
}

/// Mock LLM client with configurable routing and specialist responses.
///
/// # Examples
///
/// ```ignore
/// // Navigator answers "Hello" directly
/// let client = MockLLMClient::new("Hello. How may I direct you?");
///
/// // Navigator delegates, specialist answers
/// let client = MockLLMClient::delegating(
///     "MedicalRecordsAgent",
///     json!({"patient_records_inquiry": "blood test"}),
///     "⚠️ **CONFIDENTIAL - PROTECTED HEALTH INFORMATION**",
/// );
///
/// // Every call fails
/// let client = MockLLMClient::failing();
/// ```
#[derive(Clone, Default)]
pub struct MockLLMClient {
    response: String,
    tool_calls: Vec<ToolCall>,
    specialist_reply: String,
    route_fails: bool,
    specialist_fails: bool,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockLLMClient {
    /// Navigator replies with plain text
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            ..Default::default()
        }
    }

    /// Navigator replies with text and function calls
    pub fn with_tool_calls(response: &str, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            response: response.to_string(),
            tool_calls,
            ..Default::default()
        }
    }

    /// Navigator calls `capability` with `arguments`; the specialist answers `reply`
    pub fn delegating(capability: &str, arguments: Value, reply: &str) -> Self {
        Self {
            tool_calls: vec![tool_call(capability, arguments)],
            specialist_reply: reply.to_string(),
            ..Default::default()
        }
    }

    /// Every call fails
    pub fn failing() -> Self {
        Self {
            route_fails: true,
            specialist_fails: true,
            ..Default::default()
        }
    }

    /// Routing works as scripted, the specialist call fails
    pub fn with_failing_specialist(mut self) -> Self {
        self.specialist_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_tools(
        &self,
        system: &str,
        prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.calls.lock().push(RecordedCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            tools: tools.iter().map(|t| t.name.clone()).collect(),
            web_search: None,
        });

        if self.route_fails {
            return Err(AppError::ServiceUnavailable("Mock LLM failure".to_string()));
        }

        Ok(LLMResponse {
            content: self.response.clone(),
            tool_calls: self.tool_calls.clone(),
            finish_reason: if self.tool_calls.is_empty() {
                "stop".to_string()
            } else {
                "tool_calls".to_string()
            },
        })
    }

    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        self.calls.lock().push(RecordedCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            tools: vec![],
            web_search: Some(options.web_search),
        });

        if self.specialist_fails {
            return Err(AppError::ServiceUnavailable("Mock LLM failure".to_string()));
        }
        Ok(self.specialist_reply.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Client whose routing call parks until released, for in-flight tests
pub struct BlockingLLMClient {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl BlockingLLMClient {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl LLMClient for BlockingLLMClient {
    async fn generate_with_tools(
        &self,
        _system: &str,
        _prompt: &str,
        _tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(LLMResponse {
            content: "Released.".to_string(),
            tool_calls: vec![],
            finish_reason: "stop".to_string(),
        })
    }

    async fn generate_with_system(
        &self,
        _system: &str,
        _prompt: &str,
        _options: GenerationOptions,
    ) -> Result<String> {
        Ok(String::new())
    }

    fn model_name(&self) -> &str {
        "blocking-model"
    }
}

pub fn tool_call(name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: format!("call-{}", name),
        name: name.to_string(),
        arguments,
    }
}

/// Config with no hand-off delay and no welcome message
pub fn test_config() -> HubConfig {
    let mut config = HubConfig::default();
    config.hub.handoff_delay_ms = 0;
    config.hub.welcome = false;
    config
}

/// Controller wired to `llm` through the real delegation client
pub fn controller(llm: Arc<dyn LLMClient>) -> ConversationController {
    let registry = Arc::new(RoleRegistry::new());
    let delegator = Arc::new(DelegationClient::new(llm, registry.clone()));
    ConversationController::new(delegator, registry)
        .with_handoff_delay(Duration::ZERO)
        .without_welcome()
}

/// Application state wired to `llm`
pub fn app_state(llm: Arc<dyn LLMClient>) -> AppState {
    let config = test_config();
    let registry = Arc::new(RoleRegistry::with_overrides(&config.role_overrides()));
    let delegator = Arc::new(DelegationClient::new(llm, registry.clone()));
    AppState::with_delegator(config, registry, delegator)
}
