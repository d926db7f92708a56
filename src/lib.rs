//! # MedHub - Hospital Delegation Hub
//!
//! A conversational front door for hospital requests. Every user message is
//! first seen by the **Navigator**, which only decides where the request
//! belongs; the answer itself comes from one of four specialist roles:
//!
//! | Role | Mandate |
//! |------|---------|
//! | Medical Records | Data Security & Confidentiality |
//! | Billing & Finance | Finance & Transparency |
//! | Patient Admin | Documentation & Data Integrity |
//! | Scheduler | Time Logistics |
//!
//! Routing and specialist answers are produced by a hosted generative model
//! (Google Gemini) behind the [`LLMClient`] trait.
//!
//! ## Usage
//!
//! MedHub can be used in two ways:
//!
//! 1. **As a binary** - `medhub chat` for the terminal, `medhub serve` for HTTP
//! 2. **As a library** - Embed the [`ConversationController`] in your own service
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use medhub::{ConversationController, DelegationClient, HubConfig, Provider, RoleRegistry};
//! use std::sync::Arc;
//!
//! let config = HubConfig::load_or_default("medhub.toml")?;
//! let registry = Arc::new(RoleRegistry::with_overrides(&config.role_overrides()));
//! let llm = Provider::from_config(&config).create_client()?;
//! let delegator = Arc::new(DelegationClient::new(llm, registry.clone()));
//! let hub = ConversationController::from_settings(delegator, registry, &config.hub);
//!
//! let outcome = hub.submit("I need my blood test results").await;
//! ```
//!
//! ## Configuration
//!
//! Settings live in `medhub.toml` (server, provider, hub pacing, per-role
//! overrides). The API key is read from the environment (`API_KEY` by
//! default); a `.env` file is honoured by the binary.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Roles, routing, and the conversation controller.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Terminal front end (argument parsing, output, REPL).
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Delegation capability declarations.
pub mod tools;
/// Core types (messages, outcomes, errors).
pub mod types;
/// Configuration and logging setup.
pub mod utils;

// Re-export commonly used types
pub use agents::{ConversationController, DelegationClient, Delegator, RoleRegistry};
pub use llm::{LLMClient, LLMResponse, Provider};
pub use types::{AppError, Result};
pub use utils::toml_config::HubConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<HubConfig>,
    /// Role registry with overrides applied
    pub registry: Arc<RoleRegistry>,
    /// The single conversation this process hosts
    pub controller: Arc<ConversationController>,
}

impl AppState {
    /// Wire registry, provider client, and controller from configuration
    pub fn from_config(config: HubConfig) -> Result<Self> {
        let registry = Arc::new(RoleRegistry::with_overrides(&config.role_overrides()));
        let provider = Provider::from_config(&config);
        let llm = provider.create_client()?;
        tracing::info!(
            provider = provider.name(),
            model = llm.model_name(),
            "LLM client ready"
        );

        let delegator = Arc::new(DelegationClient::new(llm, registry.clone()));
        Ok(Self::with_delegator(config, registry, delegator))
    }

    /// Build state around an existing delegator
    pub fn with_delegator(
        config: HubConfig,
        registry: Arc<RoleRegistry>,
        delegator: Arc<dyn Delegator>,
    ) -> Self {
        let controller = Arc::new(ConversationController::from_settings(
            delegator,
            registry.clone(),
            &config.hub,
        ));
        Self {
            config: Arc::new(config),
            registry,
            controller,
        }
    }
}
