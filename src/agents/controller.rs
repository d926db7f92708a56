//! Conversation controller
//!
//! Owns the transcript and drives one turn at a time:
//!
//! ```text
//! Idle → Routing → Delegating → Idle
//!               ↘ Direct    → Idle
//! ```
//!
//! Presentation state (phase, highlighted role, error banner) lives in a
//! separate [`HubStatus`] snapshot so the transcript only holds messages.

use crate::{
    agents::{delegation::Delegator, roles::RoleRegistry, roles::WELCOME_MESSAGE},
    types::{
        AppError, ChatResponse, Message, RejectReason, Result, Role, StatusResponse, TurnOutcome,
        TurnPhase,
    },
    utils::toml_config::HubSettings,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Banner shown after a routing failure
pub const CONNECTION_ERROR_BANNER: &str =
    "System Connection Error. Please verify API Key configuration.";

/// In-band transcript entry recorded for a routing failure
pub const HUB_OFFLINE_MESSAGE: &str =
    "Error: Unable to process request. The delegation hub is offline.";

const DEFAULT_HANDOFF_DELAY: Duration = Duration::from_millis(800);

/// Presentation state for the current (or last) turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubStatus {
    pub phase: TurnPhase,
    /// Role currently highlighted in the UI
    pub active_role: Option<Role>,
    /// Error banner; cleared when the next turn is accepted
    pub error: Option<String>,
}

pub struct ConversationController {
    delegator: Arc<dyn Delegator>,
    registry: Arc<RoleRegistry>,
    transcript: RwLock<Vec<Message>>,
    status: RwLock<HubStatus>,
    in_flight: AtomicBool,
    handoff_delay: Duration,
}

/// Clears the in-flight flag and returns the phase to `Idle` on every exit path.
struct TurnGuard<'a> {
    controller: &'a ConversationController,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.controller.status.write().phase = TurnPhase::Idle;
        self.controller.in_flight.store(false, Ordering::Release);
    }
}

impl ConversationController {
    /// Controller with the welcome message seeded and the default hand-off delay
    pub fn new(delegator: Arc<dyn Delegator>, registry: Arc<RoleRegistry>) -> Self {
        Self {
            delegator,
            registry,
            transcript: RwLock::new(vec![Message::assistant(Role::Navigator, WELCOME_MESSAGE)]),
            status: RwLock::new(HubStatus::default()),
            in_flight: AtomicBool::new(false),
            handoff_delay: DEFAULT_HANDOFF_DELAY,
        }
    }

    /// Controller configured from the `[hub]` section
    pub fn from_settings(
        delegator: Arc<dyn Delegator>,
        registry: Arc<RoleRegistry>,
        settings: &HubSettings,
    ) -> Self {
        let controller =
            Self::new(delegator, registry).with_handoff_delay(settings.handoff_delay());
        if settings.welcome {
            controller
        } else {
            controller.without_welcome()
        }
    }

    pub fn with_handoff_delay(mut self, delay: Duration) -> Self {
        self.handoff_delay = delay;
        self
    }

    /// Start from an empty transcript
    pub fn without_welcome(self) -> Self {
        self.transcript.write().clear();
        self
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Submit user text and run the turn to completion.
    pub async fn submit(&self, text: &str) -> TurnOutcome {
        self.submit_turn(text).await.outcome
    }

    /// Like [`submit`](Self::submit), also returning the messages this turn appended.
    pub async fn submit_turn(&self, text: &str) -> ChatResponse {
        let text = text.trim();
        if text.is_empty() {
            return Self::rejected(RejectReason::Empty);
        }

        let Some(_guard) = self.begin_turn() else {
            tracing::debug!("Submission rejected: a turn is already in flight");
            return Self::rejected(RejectReason::Busy);
        };

        let start = {
            let mut transcript = self.transcript.write();
            transcript.push(Message::user(text));
            transcript.len() - 1
        };

        let outcome = self.run_turn(text).await;
        ChatResponse {
            outcome,
            messages: self.messages_since(start),
        }
    }

    /// Run the turn on its own task.
    ///
    /// Once accepted, the turn finishes even if the returned future is dropped,
    /// so the transcript never ends on a hand-off without the specialist reply.
    pub async fn submit_detached(self: Arc<Self>, text: String) -> Result<ChatResponse> {
        tokio::spawn(async move { self.submit_turn(&text).await })
            .await
            .map_err(|e| AppError::Internal(format!("Turn task failed: {}", e)))
    }

    async fn run_turn(&self, text: &str) -> TurnOutcome {
        self.set_status(TurnPhase::Routing, Some(Role::Navigator));

        let decision = match self.delegator.route(text).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::error!(error = %e, "Routing failed");
                {
                    let mut status = self.status.write();
                    status.error = Some(CONNECTION_ERROR_BANNER.to_string());
                    status.active_role = None;
                }
                self.push(Message::system_error(HUB_OFFLINE_MESSAGE));
                return TurnOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        match decision.target {
            Some(role) => {
                tracing::info!(role = %role, reasoning = %decision.reasoning, "Delegating");
                self.push(Message::delegation_log(
                    role,
                    format!(
                        "VALIDATED: Delegating to {} Module",
                        self.registry.display_name(role)
                    ),
                ));
                self.set_status(TurnPhase::Delegating, Some(role));

                if !self.handoff_delay.is_zero() {
                    tokio::time::sleep(self.handoff_delay).await;
                }

                let reply = self.delegator.execute(role, &decision.query).await;
                self.push(Message::assistant(role, reply));
                TurnOutcome::Delegated { role }
            }
            None => {
                tracing::info!(reasoning = %decision.reasoning, "Answering directly");
                self.push(Message::assistant(Role::Navigator, decision.query));
                self.set_status(TurnPhase::Direct, None);
                TurnOutcome::Direct
            }
        }
    }

    fn begin_turn(&self) -> Option<TurnGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        // Accepted: a new turn clears the previous banner
        self.status.write().error = None;
        Some(TurnGuard { controller: self })
    }

    fn rejected(reason: RejectReason) -> ChatResponse {
        ChatResponse {
            outcome: TurnOutcome::Rejected { reason },
            messages: Vec::new(),
        }
    }

    fn push(&self, message: Message) {
        self.transcript.write().push(message);
    }

    fn set_status(&self, phase: TurnPhase, active_role: Option<Role>) {
        let mut status = self.status.write();
        status.phase = phase;
        status.active_role = active_role;
    }

    /// Snapshot of the full transcript
    pub fn messages(&self) -> Vec<Message> {
        self.transcript.read().clone()
    }

    /// Messages from index `start` onwards
    pub fn messages_since(&self, start: usize) -> Vec<Message> {
        let transcript = self.transcript.read();
        transcript.get(start..).map(<[Message]>::to_vec).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.transcript.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.read().is_empty()
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn status(&self) -> HubStatus {
        self.status.read().clone()
    }

    /// Status in its API shape
    pub fn status_response(&self) -> StatusResponse {
        let status = self.status();
        StatusResponse {
            processing: self.is_processing(),
            phase: status.phase,
            active_role: status.active_role,
            error: status.error,
        }
    }
}
