use crate::{
    agents::{roles::RoleRegistry, router::RoutingDecision},
    llm::{GenerationOptions, LLMClient},
    types::{Result, Role},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Placeholder used when a specialist answers with empty text
pub const EMPTY_RESPONSE: &str = "Agent processed the request but returned no content.";

/// The two model-backed steps of a turn.
///
/// `route` failures are fatal to the turn. `execute` never fails: problems
/// are folded into the returned text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Delegator: Send + Sync {
    /// Ask the Navigator what to do with `text`
    async fn route(&self, text: &str) -> Result<RoutingDecision>;

    /// Run `query` under `role`'s instruction
    async fn execute(&self, role: Role, query: &str) -> String;
}

/// [`Delegator`] backed by an [`LLMClient`] and the role registry.
pub struct DelegationClient {
    llm: Arc<dyn LLMClient>,
    registry: Arc<RoleRegistry>,
}

impl DelegationClient {
    pub fn new(llm: Arc<dyn LLMClient>, registry: Arc<RoleRegistry>) -> Self {
        Self { llm, registry }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    fn failure_message(&self, role: Role) -> String {
        format!(
            "An error occurred within the {} module.",
            self.registry.display_name(role)
        )
    }
}

#[async_trait]
impl Delegator for DelegationClient {
    async fn route(&self, text: &str) -> Result<RoutingDecision> {
        let tools = self.registry.capability_definitions();
        let response = self
            .llm
            .generate_with_tools(self.registry.instruction(Role::Navigator), text, &tools)
            .await?;

        let decision = RoutingDecision::from_response(&response, text);
        tracing::debug!(
            target_role = ?decision.target,
            reasoning = %decision.reasoning,
            "Routing decision"
        );
        Ok(decision)
    }

    async fn execute(&self, role: Role, query: &str) -> String {
        let profile = self.registry.profile(role);
        let options = GenerationOptions::with_web_search(profile.web_search);

        match self
            .llm
            .generate_with_system(&profile.instruction, query, options)
            .await
        {
            Ok(text) if text.trim().is_empty() => EMPTY_RESPONSE.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::error!(role = %role, error = %e, "Specialist call failed");
                self.failure_message(role)
            }
        }
    }
}
