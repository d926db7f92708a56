//! Tool declarations offered to the model
//!
//! The hub never executes tools locally. The Navigator is offered one
//! [`delegation`](crate::tools::delegation) capability per specialist; a
//! function call from the model is read as "hand this request to that role".
//!
//! Web search is a provider-side capability and is requested per call through
//! [`GenerationOptions`](crate::llm::GenerationOptions) instead of being
//! declared here.
//!
//! ```ignore
//! let tools = medhub::tools::delegation::definitions();
//! let response = client.generate_with_tools(system, "I need my results", &tools).await?;
//! ```

/// Specialist hand-off declarations.
pub mod delegation;

pub use delegation::{DelegationCapability, CAPABILITIES};
