use crate::{llm::LLMResponse, tools::DelegationCapability, types::Role};

/// Spoken by the Navigator when the model answers with nothing at all
pub const NAVIGATOR_FALLBACK: &str = "I am the Hospital Navigator. How can I direct you?";

const DIRECT_REASONING: &str = "General Interaction";

/// What the Navigator decided to do with one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    /// `Some` when a specialist should handle the request
    pub target: Option<Role>,
    /// The query to forward, or the Navigator's own reply when `target` is `None`
    pub query: String,
    pub reasoning: String,
}

impl RoutingDecision {
    /// Delegate `query` to `role`.
    pub fn delegate(role: Role, query: impl Into<String>) -> Self {
        let capability = DelegationCapability::for_role(role).map_or("Navigator", |c| c.name);
        Self {
            target: Some(role),
            query: query.into(),
            reasoning: format!("Intent verified. Routing to {}.", capability),
        }
    }

    /// Answer without delegating.
    pub fn direct(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        let query = if reply.trim().is_empty() {
            NAVIGATOR_FALLBACK.to_string()
        } else {
            reply
        };
        Self {
            target: None,
            query,
            reasoning: DIRECT_REASONING.to_string(),
        }
    }

    /// Interpret the routing model's response.
    ///
    /// - A call to a known capability delegates, forwarding its parameter
    ///   (or `user_text` when the parameter is missing or blank).
    /// - A call to an unknown name falls through to a direct answer.
    /// - Plain text is a direct answer.
    pub fn from_response(response: &LLMResponse, user_text: &str) -> Self {
        if let Some(call) = response.first_tool_call() {
            match DelegationCapability::for_name(&call.name) {
                Some(capability) => {
                    let query = capability
                        .extract_query(call)
                        .unwrap_or_else(|| user_text.to_string());
                    return Self::delegate(capability.role, query);
                }
                None => {
                    tracing::warn!(name = %call.name, "Model called an unknown capability");
                }
            }
        }

        Self::direct(response.content.clone())
    }

    pub fn is_delegation(&self) -> bool {
        self.target.is_some()
    }
}
