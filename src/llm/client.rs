//! LLM client abstraction and provider selection
//!
//! The hub needs exactly two things from a model service:
//! - a routing call that may answer with a function call ([`LLMClient::generate_with_tools`])
//! - a plain generation under a system instruction, optionally grounded with
//!   web search ([`LLMClient::generate_with_system`])

use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use crate::utils::toml_config::{HubConfig, ProviderConfig};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Generic LLM client trait for provider abstraction
///
/// Implementations must fail with [`AppError::MissingCredential`] before any
/// network attempt when no API key is configured.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate with tool calling support
    async fn generate_with_tools(
        &self,
        system: &str,
        prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse>;

    /// Generate with system prompt
    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Per-call switches for [`LLMClient::generate_with_system`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Offer the provider's web search capability for this call only
    pub web_search: bool,
}

impl GenerationOptions {
    pub fn with_web_search(web_search: bool) -> Self {
        Self { web_search }
    }
}

/// Response from an LLM generation request
#[derive(Debug, Clone, Default)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
}

impl LLMResponse {
    /// The first function call, if the model selected one
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.tool_calls.first()
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// Google Gemini `generateContent` REST API
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Gemini {
    ///     api_key: std::env::var("API_KEY").ok(),
    ///     api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
    ///     model: "gemini-2.5-flash".to_string(),
    ///     timeout: Duration::from_secs(60),
    /// };
    /// ```
    Gemini {
        /// `None` keeps the client constructible; every call then fails
        api_key: Option<String>,
        api_base: String,
        model: String,
        timeout: Duration,
    },
}

impl Provider {
    /// Build the provider from configuration, reading the key from the environment
    pub fn from_config(config: &HubConfig) -> Self {
        let api_key = config.api_key();
        match &config.provider {
            ProviderConfig::Gemini {
                api_base,
                model,
                timeout_secs,
                ..
            } => Provider::Gemini {
                api_key,
                api_base: api_base.clone(),
                model: model.clone(),
                timeout: Duration::from_secs(*timeout_secs),
            },
        }
    }

    /// Create a client instance for this provider
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>> {
        match self {
            Provider::Gemini {
                api_key,
                api_base,
                model,
                timeout,
            } => {
                let client = super::gemini::GeminiClient::new(
                    api_key.clone(),
                    api_base.clone(),
                    model.clone(),
                    *timeout,
                )?;
                Ok(Arc::new(client))
            }
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini { .. } => "Gemini",
        }
    }

    /// Whether a credential is available
    pub fn has_credential(&self) -> bool {
        match self {
            Provider::Gemini { api_key, .. } => api_key.is_some(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::ServiceUnavailable(format!("HTTP request failed: {}", e))
    }
}
