use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

/// Result of one submitted turn, together with the messages it appended.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub outcome: TurnOutcome,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub processing: bool,
    pub phase: TurnPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============= Role Types =============

/// Fixed set of identities a turn can be attributed to.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Navigator,
    MedicalRecords,
    BillingInsurance,
    PatientInfo,
    AppointmentScheduler,
}

impl Role {
    /// Every role, Navigator first, in registry order.
    pub const ALL: [Role; 5] = [
        Role::Navigator,
        Role::MedicalRecords,
        Role::BillingInsurance,
        Role::PatientInfo,
        Role::AppointmentScheduler,
    ];

    /// The roles the Navigator can delegate to.
    pub const SPECIALISTS: [Role; 4] = [
        Role::MedicalRecords,
        Role::BillingInsurance,
        Role::PatientInfo,
        Role::AppointmentScheduler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Navigator => "navigator",
            Role::MedicalRecords => "medical_records",
            Role::BillingInsurance => "billing_insurance",
            Role::PatientInfo => "patient_info",
            Role::AppointmentScheduler => "appointment_scheduler",
        }
    }

    /// Parse a role key as written in configuration files.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().replace('-', "_").as_str() {
            "navigator" | "router" => Some(Role::Navigator),
            "medical_records" | "records" => Some(Role::MedicalRecords),
            "billing_insurance" | "billing" => Some(Role::BillingInsurance),
            "patient_info" | "patient_admin" => Some(Role::PatientInfo),
            "appointment_scheduler" | "scheduler" => Some(Role::AppointmentScheduler),
            _ => None,
        }
    }

    /// Dense index used for O(1) profile lookup.
    pub(crate) fn index(&self) -> usize {
        match self {
            Role::Navigator => 0,
            Role::MedicalRecords => 1,
            Role::BillingInsurance => 2,
            Role::PatientInfo => 3,
            Role::AppointmentScheduler => 4,
        }
    }

    pub fn is_specialist(&self) -> bool {
        !matches!(self, Role::Navigator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============= Conversation Types =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub origin: MessageOrigin,
    /// Set for assistant and system entries only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Rendering hint: delegation and error log lines
    #[serde(default)]
    pub is_delegation_log: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    User,
    Assistant,
    System,
}

impl Message {
    fn build(origin: MessageOrigin, role: Option<Role>, content: String, log: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            role,
            content,
            timestamp: Utc::now(),
            is_delegation_log: log,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::build(MessageOrigin::User, None, content.into(), false)
    }

    pub fn assistant(role: Role, content: impl Into<String>) -> Self {
        Self::build(MessageOrigin::Assistant, Some(role), content.into(), false)
    }

    /// In-band log line announcing a hand-off to `role`.
    pub fn delegation_log(role: Role, content: impl Into<String>) -> Self {
        Self::build(MessageOrigin::System, Some(role), content.into(), true)
    }

    /// In-band system error line; rendered like a log entry.
    pub fn system_error(content: impl Into<String>) -> Self {
        Self::build(
            MessageOrigin::System,
            Some(Role::Navigator),
            content.into(),
            true,
        )
    }
}

// ============= Turn Types =============

/// Lifecycle of a single turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    #[default]
    Idle,
    Routing,
    Delegating,
    Direct,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RejectReason {
    Empty,
    Busy,
}

/// How a submission ended.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TurnOutcome {
    /// Nothing was appended
    Rejected { reason: RejectReason },
    /// The Navigator answered without delegating
    Direct,
    Delegated { role: Role },
    /// Routing failed; the error is recorded in-band
    Failed { error: String },
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("API key is missing for provider {0}")]
    MissingCredential(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A turn is already in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::MissingCredential(_) | AppError::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
