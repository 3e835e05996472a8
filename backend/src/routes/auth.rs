//! Authentication routes
//!
//! Login and token refresh are public; registering a user requires an
//! administrator.

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use diet_tracker_shared::types::{
    AuthTokens, LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest, UserProfile,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/profile", get(get_profile))
}

/// POST /api/v1/auth/register - Create a user account (administrators only)
async fn register(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = UserService::register(state.db(), &req).await?;

    tracing::debug!(admin_id = %admin.user_id, user_id = %profile.id, "Account created by admin");

    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = UserService::login(state.db(), state.jwt(), &req.email, &req.password).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::refresh(state.db(), state.jwt(), &req.refresh_token).await?;
    Ok(Json(tokens))
}

/// GET /api/v1/auth/profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}
