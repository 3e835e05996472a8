//! Body measurement routes

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::MeasurementService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use diet_tracker_shared::types::{
    LimitQuery, MeasurementRequest, MeasurementResponse, MeasurementStatsResponse, ProgressPoint,
};

/// Create body measurement routes
pub fn measurement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_measurements).post(create_measurement))
        .route("/latest", get(get_latest))
        .route("/stats", get(get_stats))
        .route("/progress/:field", get(get_progress))
        .route(
            "/:id",
            get(get_measurement)
                .patch(update_measurement)
                .delete(delete_measurement),
        )
}

/// POST /api/v1/body-measurements
async fn create_measurement(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<MeasurementRequest>,
) -> ApiResult<(StatusCode, Json<MeasurementResponse>)> {
    let measurement = MeasurementService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(measurement)))
}

/// GET /api/v1/body-measurements?limit= - Newest first
async fn list_measurements(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<MeasurementResponse>>> {
    let measurements = MeasurementService::list(state.db(), auth.user_id, query.limit).await?;
    Ok(Json(measurements))
}

/// GET /api/v1/body-measurements/latest - `null` when nothing is recorded
async fn get_latest(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Option<MeasurementResponse>>> {
    let latest = MeasurementService::latest(state.db(), auth.user_id).await?;
    Ok(Json(latest))
}

/// GET /api/v1/body-measurements/stats
async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Option<MeasurementStatsResponse>>> {
    let stats = MeasurementService::stats(state.db(), auth.user_id).await?;
    Ok(Json(stats))
}

/// GET /api/v1/body-measurements/progress/:field?limit=30 - Oldest first
async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(field): Path<String>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<ProgressPoint>>> {
    let points =
        MeasurementService::progress(state.db(), auth.user_id, &field, query.limit).await?;
    Ok(Json(points))
}

/// GET /api/v1/body-measurements/:id
async fn get_measurement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MeasurementResponse>> {
    let id = parse_id(&id, "measurement")?;
    let measurement = MeasurementService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(measurement))
}

/// PATCH /api/v1/body-measurements/:id
async fn update_measurement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<MeasurementRequest>,
) -> ApiResult<Json<MeasurementResponse>> {
    let id = parse_id(&id, "measurement")?;
    let measurement = MeasurementService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(measurement))
}

/// DELETE /api/v1/body-measurements/:id
async fn delete_measurement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "measurement")?;
    MeasurementService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(()))
}
