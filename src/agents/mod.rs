/// Conversation state machine and transcript.
pub mod controller;
/// Route/execute boundary backed by the model client.
pub mod delegation;
/// Role profiles and instruction text.
pub mod roles;
/// Interpretation of the Navigator's routing response.
pub mod router;

// Re-export commonly used types
pub use controller::{ConversationController, HubStatus};
pub use delegation::{DelegationClient, Delegator};
pub use roles::{RoleProfile, RoleRegistry};
pub use router::RoutingDecision;
