use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Routes mounted under `/api`
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(crate::api::handlers::chat::chat))
        .route("/messages", get(crate::api::handlers::chat::get_messages))
        .route("/status", get(crate::api::handlers::chat::get_status))
        .route("/roles", get(crate::api::handlers::roles::list_roles))
}
