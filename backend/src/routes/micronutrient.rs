//! Micronutrient catalogue routes

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::MicronutrientService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use diet_tracker_shared::types::{
    CreateMicronutrientRequest, MicronutrientResponse, UpdateMicronutrientRequest,
};

/// Create micronutrient routes
pub fn micronutrient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_micronutrients).post(create_micronutrient))
        .route(
            "/:id",
            get(get_micronutrient)
                .patch(update_micronutrient)
                .delete(delete_micronutrient),
        )
}

/// POST /api/v1/micronutrients
async fn create_micronutrient(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateMicronutrientRequest>,
) -> ApiResult<(StatusCode, Json<MicronutrientResponse>)> {
    let micronutrient = MicronutrientService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(micronutrient)))
}

/// GET /api/v1/micronutrients - Ordered by name
async fn list_micronutrients(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<MicronutrientResponse>>> {
    let micronutrients = MicronutrientService::list(state.db(), auth.user_id).await?;
    Ok(Json(micronutrients))
}

/// GET /api/v1/micronutrients/:id
async fn get_micronutrient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MicronutrientResponse>> {
    let id = parse_id(&id, "micronutrient")?;
    let micronutrient = MicronutrientService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(micronutrient))
}

/// PATCH /api/v1/micronutrients/:id
async fn update_micronutrient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateMicronutrientRequest>,
) -> ApiResult<Json<MicronutrientResponse>> {
    let id = parse_id(&id, "micronutrient")?;
    let micronutrient = MicronutrientService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(micronutrient))
}

/// DELETE /api/v1/micronutrients/:id
async fn delete_micronutrient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "micronutrient")?;
    MicronutrientService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(()))
}
