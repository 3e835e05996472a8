//! Exercise library API routes

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::ExerciseService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use diet_tracker_shared::types::{
    CreateExerciseRequest, ExerciseQuery, ExerciseResponse, UpdateExerciseRequest,
};

/// Create exercise routes
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route("/muscle-groups", get(get_muscle_groups))
        .route(
            "/:id",
            get(get_exercise).patch(update_exercise).delete(delete_exercise),
        )
}

/// POST /api/v1/exercises
async fn create_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateExerciseRequest>,
) -> ApiResult<(StatusCode, Json<ExerciseResponse>)> {
    let exercise = ExerciseService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

/// GET /api/v1/exercises?muscle_group= - Ordered by name
async fn list_exercises(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExerciseQuery>,
) -> ApiResult<Json<Vec<ExerciseResponse>>> {
    let exercises =
        ExerciseService::list(state.db(), auth.user_id, query.muscle_group.as_deref()).await?;
    Ok(Json(exercises))
}

/// GET /api/v1/exercises/muscle-groups
async fn get_muscle_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<String>>> {
    let groups = ExerciseService::muscle_groups(state.db(), auth.user_id).await?;
    Ok(Json(groups))
}

/// GET /api/v1/exercises/:id
async fn get_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ExerciseResponse>> {
    let id = parse_id(&id, "exercise")?;
    let exercise = ExerciseService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(exercise))
}

/// PATCH /api/v1/exercises/:id
async fn update_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateExerciseRequest>,
) -> ApiResult<Json<ExerciseResponse>> {
    let id = parse_id(&id, "exercise")?;
    let exercise = ExerciseService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(exercise))
}

/// DELETE /api/v1/exercises/:id
async fn delete_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "exercise")?;
    ExerciseService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(()))
}
