//! Food catalogue routes

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::FoodService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use diet_tracker_shared::types::{
    CreateFoodRequest, FoodResponse, FoodSearchQuery, UpdateFoodRequest,
};

/// Create food routes
pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_foods).post(create_food))
        .route("/:id", get(get_food).patch(update_food).delete(delete_food))
}

/// POST /api/v1/foods
async fn create_food(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFoodRequest>,
) -> ApiResult<(StatusCode, Json<FoodResponse>)> {
    let food = FoodService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

/// GET /api/v1/foods?search= - Substring match on name or brand
async fn list_foods(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FoodSearchQuery>,
) -> ApiResult<Json<Vec<FoodResponse>>> {
    let foods = FoodService::list(state.db(), auth.user_id, query.search.as_deref()).await?;
    Ok(Json(foods))
}

/// GET /api/v1/foods/:id
async fn get_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<FoodResponse>> {
    let id = parse_id(&id, "food")?;
    let food = FoodService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(food))
}

/// PATCH /api/v1/foods/:id
async fn update_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFoodRequest>,
) -> ApiResult<Json<FoodResponse>> {
    let id = parse_id(&id, "food")?;
    let food = FoodService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(food))
}

/// DELETE /api/v1/foods/:id
async fn delete_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "food")?;
    FoodService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(()))
}
