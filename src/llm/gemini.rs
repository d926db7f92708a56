//! Google Gemini LLM client implementation
//!
//! Talks to the `models/{model}:generateContent` REST endpoint with `reqwest`.
//! Routing calls declare the delegation capabilities as
//! `functionDeclarations`; specialist calls may add the `googleSearch`
//! grounding tool.
//!
//! # Example
//!
//! ```rust,ignore
//! use medhub::llm::{GenerationOptions, LLMClient};
//! use medhub::llm::gemini::GeminiClient;
//!
//! let client = GeminiClient::new(
//!     std::env::var("API_KEY").ok(),
//!     "https://generativelanguage.googleapis.com/v1beta".to_string(),
//!     "gemini-2.5-flash".to_string(),
//!     std::time::Duration::from_secs(60),
//! )?;
//! let text = client
//!     .generate_with_system("You are terse.", "Hello!", GenerationOptions::default())
//!     .await?;
//! ```

use crate::llm::client::{GenerationOptions, LLMClient, LLMResponse};
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client for API-based inference
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key; `None` makes every call fail with `MissingCredential`
    /// * `api_base` - Base URL up to and including the API version
    /// * `model` - Model identifier (e.g., "gemini-2.5-flash")
    /// * `timeout` - Transport timeout for each request
    pub fn new(
        api_key: Option<String>,
        api_base: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::MissingCredential("Gemini".to_string()))
    }

    /// Build a request body for a single user turn
    fn build_request(system: &str, prompt: &str, tools: Vec<GeminiTool>) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(system)],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
            tools,
        }
    }

    /// Convert a ToolDefinition to a Gemini function declaration
    fn convert_tool(tool: &ToolDefinition) -> FunctionDeclaration {
        FunctionDeclaration {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: to_gemini_schema(&tool.parameters),
        }
    }

    async fn send(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        // Checked before building the request so a missing key never hits the network
        let api_key = self.api_key()?;

        debug!(model = %self.model, tools = body.tools.len(), "Sending Gemini request");

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ServiceUnavailable(format!(
                "Gemini request failed ({}): {}",
                status, text
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate_with_tools(
        &self,
        system: &str,
        prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let gemini_tools = if tools.is_empty() {
            vec![]
        } else {
            vec![GeminiTool::Functions {
                function_declarations: tools.iter().map(Self::convert_tool).collect(),
            }]
        };

        let request = Self::build_request(system, prompt, gemini_tools);
        let response = self.send(&request).await?;
        response.into_llm_response()
    }

    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        let tools = if options.web_search {
            vec![GeminiTool::Search {
                google_search: serde_json::Map::new(),
            }]
        } else {
            vec![]
        };

        let request = Self::build_request(system, prompt, tools);
        let response = self.send(&request).await?;
        Ok(response.into_llm_response()?.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Gemini expects OpenAPI-style upper-case type names (`OBJECT`, `STRING`)
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let converted = match (k.as_str(), v) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        // property names are user data, only their schemas convert
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, s)| (name.clone(), to_gemini_schema(s)))
                                .collect(),
                        ),
                        _ => to_gemini_schema(v),
                    };
                    (k.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

// ============= Wire Types =============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            function_call: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiTool {
    #[serde(rename_all = "camelCase")]
    Functions {
        function_declarations: Vec<FunctionDeclaration>,
    },
    #[serde(rename_all = "camelCase")]
    Search {
        google_search: serde_json::Map<String, Value>,
    },
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_llm_response(self) -> Result<LLMResponse> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(AppError::ServiceUnavailable(format!(
                    "Prompt blocked by provider: {}",
                    reason
                )));
            }
            return Ok(LLMResponse {
                finish_reason: "stop".to_string(),
                ..Default::default()
            });
        };

        let mut content = String::new();
        let mut tool_calls = Vec::new();
        for part in candidate.content.parts {
            if let Some(text) = part.text {
                content.push_str(&text);
            }
            if let Some(call) = part.function_call {
                tool_calls.push(ToolCall {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: call.name,
                    arguments: call.args,
                });
            }
        }

        let finish_reason = if tool_calls.is_empty() {
            candidate
                .finish_reason
                .map(|r| r.to_lowercase())
                .unwrap_or_else(|| "stop".to_string())
        } else {
            "tool_calls".to_string()
        };

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_conversion_uppercases_types_only() {
        let schema = json!({
            "type": "object",
            "properties": {
                "type": { "type": "string", "description": "a field literally named type" }
            },
            "required": ["type"]
        });

        let converted = to_gemini_schema(&schema);
        assert_eq!(converted["type"], "OBJECT");
        assert_eq!(converted["properties"]["type"]["type"], "STRING");
        assert_eq!(
            converted["properties"]["type"]["description"],
            "a field literally named type"
        );
        assert_eq!(converted["required"], json!(["type"]));
    }

    #[test]
    fn test_request_body_with_functions() {
        let tool = ToolDefinition {
            name: "MedicalRecordsAgent".to_string(),
            description: "records".to_string(),
            parameters: json!({"type": "object", "properties": {}, "required": []}),
        };
        let request = GeminiClient::build_request(
            "route",
            "I need my results",
            vec![GeminiTool::Functions {
                function_declarations: vec![GeminiClient::convert_tool(&tool)],
            }],
        );

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "route");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "I need my results");
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "MedicalRecordsAgent"
        );
        assert!(body["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_request_body_with_search() {
        let request = GeminiClient::build_request(
            "bill",
            "Does BlueCross cover MRI?",
            vec![GeminiTool::Search {
                google_search: serde_json::Map::new(),
            }],
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
    }

    #[test]
    fn test_request_body_without_tools_omits_field() {
        let request = GeminiClient::build_request("sys", "hi", vec![]);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_function_call_response() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {
                            "name": "BillingAndInsuranceAgent",
                            "args": { "financial_and_insurance_query": "Explain my invoice" }
                        }
                    }]
                },
                "finishReason": "STOP"
            }]
        });

        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = parsed.into_llm_response().unwrap();
        assert_eq!(response.finish_reason, "tool_calls");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "BillingAndInsuranceAgent");
        assert_eq!(
            response.tool_calls[0].arguments["financial_and_insurance_query"],
            "Explain my invoice"
        );
    }

    #[test]
    fn test_parse_text_response_joins_parts() {
        let raw = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello, " }, { "text": "patient." }] },
                "finishReason": "STOP"
            }]
        });

        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = parsed.into_llm_response().unwrap();
        assert_eq!(response.content, "Hello, patient.");
        assert_eq!(response.finish_reason, "stop");
        assert!(response.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_empty_and_blocked_responses() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.into_llm_response().unwrap().content, "");

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(matches!(
            blocked.into_llm_response(),
            Err(AppError::ServiceUnavailable(msg)) if msg.contains("SAFETY")
        ));
    }
}
