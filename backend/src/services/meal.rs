//! Meal service
//!
//! Meal responses always carry freshly computed nutrition totals.

use super::nutrition::NutritionService;
use super::{delete_owned, require_all_owned, require_owned};
use crate::convert::{dec_to_f64, f64_to_dec};
use crate::error::ApiError;
use crate::repositories::{
    FoodRecord, MealChanges, MealFoodRecord, MealRecord, MealRepository, NewMeal, NewMealFood,
};
use diet_tracker_shared::types::{
    AddFoodToMealRequest, CreateMealRequest, MealFoodInput, MealFoodResponse,
    MealNutritionResponse, MealResponse, NutritionTotals, UpdateMealFoodRequest,
    UpdateMealRequest,
};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct MealService;

impl MealService {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateMealRequest,
    ) -> Result<MealResponse, ApiError> {
        let foods = Self::check_foods(db, user_id, &req.foods).await?;

        let meal = NewMeal {
            name: req.name.trim().to_string(),
            description: req.description.clone(),
            time: req.time.clone(),
            sort_order: req.order.unwrap_or(0),
        };

        let record = MealRepository::create(db, user_id, &meal, &foods)
            .await
            .map_err(ApiError::Internal)?;

        tracing::debug!(meal_id = %record.id, foods = foods.len(), "Meal created");

        Self::single(db, record).await
    }

    /// List meals with their foods and totals, ordered by display order then name
    pub async fn list(db: &PgPool, user_id: Uuid) -> Result<Vec<MealResponse>, ApiError> {
        let records = MealRepository::list(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Self::assemble(db, records).await
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<MealResponse, ApiError> {
        let record = require_owned::<MealRecord>(db, id, user_id).await?;
        Self::single(db, record).await
    }

    /// Load several owned meals in the order given
    pub async fn get_many(
        db: &PgPool,
        user_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<MealResponse>, ApiError> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            records.push(require_owned::<MealRecord>(db, *id, user_id).await?);
        }

        Self::assemble(db, records).await
    }

    pub async fn nutrition(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<MealNutritionResponse, ApiError> {
        let record = require_owned::<MealRecord>(db, id, user_id).await?;
        let mut totals = NutritionService::meal_totals(db, &[record.id]).await?;

        Ok(MealNutritionResponse {
            meal_id: record.id,
            meal_name: record.name,
            totals: totals.remove(&record.id).unwrap_or_default(),
        })
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateMealRequest,
    ) -> Result<MealResponse, ApiError> {
        require_owned::<MealRecord>(db, id, user_id).await?;

        let foods = match &req.foods {
            Some(inputs) => Some(Self::check_foods(db, user_id, inputs).await?),
            None => None,
        };

        let changes = MealChanges {
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            description: req.description.clone(),
            time: req.time.clone(),
            sort_order: req.order,
        };

        let record = MealRepository::update(db, id, user_id, &changes, foods.as_deref())
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))?;

        Self::single(db, record).await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<MealRecord>(db, id, user_id).await
    }

    pub async fn add_food(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
        req: &AddFoodToMealRequest,
    ) -> Result<MealFoodResponse, ApiError> {
        require_owned::<MealRecord>(db, meal_id, user_id).await?;
        require_owned::<FoodRecord>(db, req.food_id, user_id).await?;

        let food = NewMealFood {
            food_id: req.food_id,
            quantity: f64_to_dec(req.quantity)?,
            notes: req.notes.clone(),
        };

        let record = MealRepository::add_food(db, meal_id, &food)
            .await
            .map_err(ApiError::Internal)?;

        Ok(food_response(record))
    }

    pub async fn update_food(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
        meal_food_id: Uuid,
        req: &UpdateMealFoodRequest,
    ) -> Result<MealFoodResponse, ApiError> {
        require_owned::<MealRecord>(db, meal_id, user_id).await?;

        let record = MealRepository::update_food(
            db,
            meal_id,
            meal_food_id,
            f64_to_dec(req.quantity)?,
            req.notes.as_deref(),
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Meal food not found".to_string()))?;

        Ok(food_response(record))
    }

    pub async fn remove_food(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
        meal_food_id: Uuid,
    ) -> Result<(), ApiError> {
        require_owned::<MealRecord>(db, meal_id, user_id).await?;

        let removed = MealRepository::remove_food(db, meal_id, meal_food_id)
            .await
            .map_err(ApiError::Internal)?;

        if !removed {
            return Err(ApiError::NotFound("Meal food not found".to_string()));
        }

        Ok(())
    }

    async fn check_foods(
        db: &PgPool,
        user_id: Uuid,
        inputs: &[MealFoodInput],
    ) -> Result<Vec<NewMealFood>, ApiError> {
        let ids: Vec<Uuid> = inputs.iter().map(|f| f.food_id).collect();
        require_all_owned::<FoodRecord>(db, &ids, user_id).await?;

        inputs
            .iter()
            .map(|f| {
                Ok(NewMealFood {
                    food_id: f.food_id,
                    quantity: f64_to_dec(f.quantity)?,
                    notes: None,
                })
            })
            .collect()
    }

    async fn single(db: &PgPool, record: MealRecord) -> Result<MealResponse, ApiError> {
        Self::assemble(db, vec![record])
            .await?
            .pop()
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))
    }

    async fn assemble(db: &PgPool, records: Vec<MealRecord>) -> Result<Vec<MealResponse>, ApiError> {
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

        let lines = MealRepository::foods_for(db, &ids)
            .await
            .map_err(ApiError::Internal)?;
        let totals = NutritionService::meal_totals(db, &ids).await?;

        let mut by_meal: HashMap<Uuid, Vec<MealFoodResponse>> = HashMap::new();
        for line in lines {
            by_meal.entry(line.meal_id).or_default().push(food_response(line));
        }

        Ok(records
            .into_iter()
            .map(|record| MealResponse {
                foods: by_meal.get(&record.id).cloned().unwrap_or_default(),
                totals: totals.get(&record.id).cloned().unwrap_or_else(NutritionTotals::default),
                id: record.id,
                name: record.name,
                description: record.description,
                time: record.time,
                order: record.sort_order,
                created_at: record.created_at,
                updated_at: record.updated_at,
            })
            .collect())
    }
}

fn food_response(record: MealFoodRecord) -> MealFoodResponse {
    MealFoodResponse {
        id: record.id,
        food_id: record.food_id,
        food_name: record.food_name,
        brand: record.brand,
        serving_size: dec_to_f64(record.serving_size),
        serving_unit: record.serving_unit,
        quantity: dec_to_f64(record.quantity),
        notes: record.notes,
    }
}
