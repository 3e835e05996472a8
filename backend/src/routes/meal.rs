//! Meal routes, including the foods inside a meal

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::MealService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use diet_tracker_shared::types::{
    AddFoodToMealRequest, CreateMealRequest, MealFoodResponse, MealNutritionResponse,
    MealResponse, UpdateMealFoodRequest, UpdateMealRequest,
};

/// Create meal routes
pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route("/:id", get(get_meal).patch(update_meal).delete(delete_meal))
        .route("/:id/nutrition", get(get_meal_nutrition))
        .route("/:id/foods", post(add_food))
        .route(
            "/:id/foods/:meal_food_id",
            patch(update_food).delete(remove_food),
        )
}

/// POST /api/v1/meals
async fn create_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateMealRequest>,
) -> ApiResult<(StatusCode, Json<MealResponse>)> {
    let meal = MealService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// GET /api/v1/meals - Ordered by position then name, with totals
async fn list_meals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<MealResponse>>> {
    let meals = MealService::list(state.db(), auth.user_id).await?;
    Ok(Json(meals))
}

/// GET /api/v1/meals/:id
async fn get_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MealResponse>> {
    let id = parse_id(&id, "meal")?;
    let meal = MealService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(meal))
}

/// GET /api/v1/meals/:id/nutrition
async fn get_meal_nutrition(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MealNutritionResponse>> {
    let id = parse_id(&id, "meal")?;
    let nutrition = MealService::nutrition(state.db(), auth.user_id, id).await?;
    Ok(Json(nutrition))
}

/// PATCH /api/v1/meals/:id
async fn update_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateMealRequest>,
) -> ApiResult<Json<MealResponse>> {
    let id = parse_id(&id, "meal")?;
    let meal = MealService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(meal))
}

/// DELETE /api/v1/meals/:id
async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "meal")?;
    MealService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(()))
}

/// POST /api/v1/meals/:id/foods
async fn add_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddFoodToMealRequest>,
) -> ApiResult<(StatusCode, Json<MealFoodResponse>)> {
    let id = parse_id(&id, "meal")?;
    let line = MealService::add_food(state.db(), auth.user_id, id, &req).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// PATCH /api/v1/meals/:id/foods/:meal_food_id
async fn update_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, meal_food_id)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<UpdateMealFoodRequest>,
) -> ApiResult<Json<MealFoodResponse>> {
    let id = parse_id(&id, "meal")?;
    let meal_food_id = parse_id(&meal_food_id, "meal food")?;
    let line = MealService::update_food(state.db(), auth.user_id, id, meal_food_id, &req).await?;
    Ok(Json(line))
}

/// DELETE /api/v1/meals/:id/foods/:meal_food_id
async fn remove_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, meal_food_id)): Path<(String, String)>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "meal")?;
    let meal_food_id = parse_id(&meal_food_id, "meal food")?;
    MealService::remove_food(state.db(), auth.user_id, id, meal_food_id).await?;
    Ok(Json(()))
}
