//! Diet routes

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::services::DietService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use diet_tracker_shared::types::{
    AddMealToDietRequest, CreateDietRequest, DietMealResponse, DietNutritionQuery,
    DietNutritionResponse, DietResponse, UpdateDietRequest,
};

/// Create diet routes
pub fn diet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_diets).post(create_diet))
        .route("/:id", get(get_diet).patch(update_diet).delete(delete_diet))
        .route("/:id/nutrition", get(get_diet_nutrition))
        .route("/:id/meals", post(add_meal))
        .route("/:id/meals/:diet_meal_id", delete(remove_meal))
}

/// POST /api/v1/diets
async fn create_diet(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateDietRequest>,
) -> ApiResult<(StatusCode, Json<DietResponse>)> {
    let diet = DietService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(diet)))
}

/// GET /api/v1/diets - Newest first
async fn list_diets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<DietResponse>>> {
    let diets = DietService::list(state.db(), auth.user_id).await?;
    Ok(Json(diets))
}

/// GET /api/v1/diets/:id
async fn get_diet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DietResponse>> {
    let id = parse_id(&id, "diet")?;
    let diet = DietService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(diet))
}

/// GET /api/v1/diets/:id/nutrition?day=N
///
/// With `day`, only meals scheduled for that weekday or for every day count.
async fn get_diet_nutrition(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<DietNutritionQuery>,
) -> ApiResult<Json<DietNutritionResponse>> {
    let id = parse_id(&id, "diet")?;
    let nutrition = DietService::nutrition(state.db(), auth.user_id, id, query.day).await?;
    Ok(Json(nutrition))
}

/// PATCH /api/v1/diets/:id
async fn update_diet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateDietRequest>,
) -> ApiResult<Json<DietResponse>> {
    let id = parse_id(&id, "diet")?;
    let diet = DietService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(diet))
}

/// DELETE /api/v1/diets/:id
async fn delete_diet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "diet")?;
    DietService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(()))
}

/// POST /api/v1/diets/:id/meals
async fn add_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddMealToDietRequest>,
) -> ApiResult<(StatusCode, Json<DietMealResponse>)> {
    let id = parse_id(&id, "diet")?;
    let entry = DietService::add_meal(state.db(), auth.user_id, id, &req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/diets/:id/meals/:diet_meal_id
async fn remove_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, diet_meal_id)): Path<(String, String)>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "diet")?;
    let diet_meal_id = parse_id(&diet_meal_id, "diet meal")?;
    DietService::remove_meal(state.db(), auth.user_id, id, diet_meal_id).await?;
    Ok(Json(()))
}
