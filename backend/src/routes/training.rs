//! Training program and session routes
//!
//! Sessions live under `/trainings/sessions`; those routes are registered
//! before `/:id` so the literal segment wins.

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::{SessionService, TrainingService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use diet_tracker_shared::types::{
    CreateSessionRequest, CreateTrainingRequest, LimitQuery, SessionResponse,
    TrainingDetailResponse, TrainingExerciseInput, TrainingExerciseResponse, TrainingResponse,
    UpdateSessionRequest, UpdateTrainingExerciseRequest, UpdateTrainingRequest,
};

/// Create training routes
pub fn training_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trainings).post(create_training))
        .route("/sessions", get(list_sessions))
        .route(
            "/sessions/:session_id",
            get(get_session).patch(update_session).delete(delete_session),
        )
        .route(
            "/:id",
            get(get_training).patch(update_training).delete(delete_training),
        )
        .route("/:id/exercises", post(add_exercise))
        .route(
            "/:id/exercises/:exercise_line_id",
            patch(update_exercise).delete(remove_exercise),
        )
        .route("/:id/sessions", post(start_session))
}

/// POST /api/v1/trainings
async fn create_training(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTrainingRequest>,
) -> ApiResult<(StatusCode, Json<TrainingResponse>)> {
    let training = TrainingService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(training)))
}

/// GET /api/v1/trainings - Newest first, with session counts
async fn list_trainings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TrainingResponse>>> {
    let trainings = TrainingService::list(state.db(), auth.user_id).await?;
    Ok(Json(trainings))
}

/// GET /api/v1/trainings/:id - Plan plus the most recent sessions
async fn get_training(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TrainingDetailResponse>> {
    let id = parse_id(&id, "training")?;
    let training = TrainingService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(training))
}

/// PATCH /api/v1/trainings/:id
async fn update_training(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTrainingRequest>,
) -> ApiResult<Json<TrainingResponse>> {
    let id = parse_id(&id, "training")?;
    let training = TrainingService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(training))
}

/// DELETE /api/v1/trainings/:id - Logged sessions are kept
async fn delete_training(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "training")?;
    TrainingService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(()))
}

/// POST /api/v1/trainings/:id/exercises
async fn add_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<TrainingExerciseInput>,
) -> ApiResult<(StatusCode, Json<TrainingExerciseResponse>)> {
    let id = parse_id(&id, "training")?;
    let line = TrainingService::add_exercise(state.db(), auth.user_id, id, &req).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// PATCH /api/v1/trainings/:id/exercises/:exercise_line_id
async fn update_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, line_id)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<UpdateTrainingExerciseRequest>,
) -> ApiResult<Json<TrainingExerciseResponse>> {
    let id = parse_id(&id, "training")?;
    let line_id = parse_id(&line_id, "training exercise")?;
    let line =
        TrainingService::update_exercise(state.db(), auth.user_id, id, line_id, &req).await?;
    Ok(Json(line))
}

/// DELETE /api/v1/trainings/:id/exercises/:exercise_line_id
async fn remove_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, line_id)): Path<(String, String)>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "training")?;
    let line_id = parse_id(&line_id, "training exercise")?;
    TrainingService::remove_exercise(state.db(), auth.user_id, id, line_id).await?;
    Ok(Json(()))
}

/// POST /api/v1/trainings/:id/sessions
///
/// Without explicit exercises the session copies the training's current plan.
async fn start_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let id = parse_id(&id, "training")?;
    let session = SessionService::create(state.db(), auth.user_id, id, &req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/trainings/sessions?limit=20
async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let sessions = SessionService::list(state.db(), auth.user_id, query.limit).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/trainings/sessions/:session_id
async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session_id = parse_id(&session_id, "session")?;
    let session = SessionService::get(state.db(), auth.user_id, session_id).await?;
    Ok(Json(session))
}

/// PATCH /api/v1/trainings/sessions/:session_id
async fn update_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateSessionRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session_id = parse_id(&session_id, "session")?;
    let session = SessionService::update(state.db(), auth.user_id, session_id, &req).await?;
    Ok(Json(session))
}

/// DELETE /api/v1/trainings/sessions/:session_id
async fn delete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> ApiResult<Json<()>> {
    let session_id = parse_id(&session_id, "session")?;
    SessionService::delete(state.db(), auth.user_id, session_id).await?;
    Ok(Json(()))
}
