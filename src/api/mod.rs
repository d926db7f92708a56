//! HTTP API Handlers and Routes
//!
//! REST surface of the hub, built on the Axum web framework. Every handler
//! talks to the shared [`ConversationController`](crate::agents::ConversationController)
//! held in [`AppState`].
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! - `POST /api/chat` - Submit a message; returns the outcome and the appended messages
//! - `GET /api/messages` - Full transcript
//! - `GET /api/status` - Processing flag, phase, highlighted role, error banner
//! - `GET /api/roles` - Role profiles (instruction text omitted)
//! - `GET /health` - Health check endpoint
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! Turns are serialized: a submission while another turn is in flight gets
//! `409 Conflict`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::AppState;
use axum::{routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// OpenAPI document for the hub's HTTP surface
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::chat::chat,
        handlers::chat::get_messages,
        handlers::chat::get_status,
        handlers::roles::list_roles,
        handlers::health::health,
    ),
    components(schemas(
        crate::types::ChatRequest,
        crate::types::ChatResponse,
        crate::types::StatusResponse,
        crate::types::Message,
        crate::types::MessageOrigin,
        crate::types::Role,
        crate::types::TurnPhase,
        crate::types::TurnOutcome,
        crate::types::RejectReason,
        crate::agents::RoleProfile,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "chat", description = "Conversation turns"),
        (name = "roles", description = "Role registry"),
        (name = "health", description = "Liveness")
    ),
    info(title = "MedHub", description = "Hospital delegation hub API")
)]
pub struct ApiDoc;

/// Full application router with middleware, ready to serve
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/api", routes::create_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
