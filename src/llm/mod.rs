//! LLM Provider Clients and Abstractions
//!
//! This module hides the hosted model service behind the [`LLMClient`] trait so
//! the delegation logic can be exercised against scripted mocks.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The two calls the hub needs (routing with tools, plain generation)
//! - [`Provider`] - Runtime provider selection built from `medhub.toml`
//! - [`gemini::GeminiClient`] - Google Gemini REST implementation
//!
//! # Example
//!
//! ```ignore
//! use medhub::llm::Provider;
//!
//! let provider = Provider::from_config(&config);
//! let client = provider.create_client()?;
//! let response = client.generate_with_tools(system, "Hello", &tools).await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Google Gemini `generateContent` client.
pub mod gemini;

pub use client::{GenerationOptions, LLMClient, LLMResponse, Provider};
