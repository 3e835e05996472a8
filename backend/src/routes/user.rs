//! Current user account routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use diet_tracker_shared::types::{UpdateUserRequest, UserProfile};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me).delete(delete_me))
}

/// GET /api/v1/users/me
async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/users/me
async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::update_me(state.db(), auth.user_id, &req).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/users/me - Delete the account and everything it owns
async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<()>> {
    UserService::delete_me(state.db(), state.storage(), auth.user_id).await?;
    Ok(Json(()))
}
