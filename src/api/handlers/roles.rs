use crate::{agents::RoleProfile, AppState};
use axum::{extract::State, Json};

/// List role profiles, Navigator first
///
/// Instruction text is never included.
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "Role profiles", body = Vec<RoleProfile>)
    ),
    tag = "roles"
)]
pub async fn list_roles(State(state): State<AppState>) -> Json<Vec<RoleProfile>> {
    Json(state.registry.profiles().cloned().collect())
}
