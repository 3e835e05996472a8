//! Food service

use super::{delete_owned, ensure_distinct, require_all_owned, require_owned};
use crate::convert::{
    dec_to_f64, f64_to_dec, f64_to_dec_scaled, opt_dec_to_f64, opt_f64_to_dec, AMOUNT_SCALE,
};
use crate::error::ApiError;
use crate::repositories::{
    FoodChanges, FoodMicronutrientRecord, FoodRecord, FoodRepository, MicronutrientRecord,
    NewFood, NewFoodMicronutrient,
};
use diet_tracker_shared::types::{
    CreateFoodRequest, FoodMicronutrientInput, FoodMicronutrientResponse, FoodResponse,
    UpdateFoodRequest,
};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

const DEFAULT_SERVING_UNIT: &str = "g";

pub struct FoodService;

impl FoodService {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateFoodRequest,
    ) -> Result<FoodResponse, ApiError> {
        let links = Self::check_micronutrients(db, user_id, &req.micronutrients).await?;

        let food = NewFood {
            name: req.name.trim().to_string(),
            brand: req.brand.clone(),
            serving_size: f64_to_dec(req.serving_size)?,
            serving_unit: req
                .serving_unit
                .clone()
                .unwrap_or_else(|| DEFAULT_SERVING_UNIT.to_string()),
            calories: f64_to_dec(req.calories)?,
            proteins: f64_to_dec(req.proteins)?,
            carbohydrates: f64_to_dec(req.carbohydrates)?,
            fats: f64_to_dec(req.fats)?,
            fiber: opt_f64_to_dec(req.fiber)?,
            sodium: opt_f64_to_dec(req.sodium)?,
        };

        let record = FoodRepository::create(db, user_id, &food, &links)
            .await
            .map_err(ApiError::Internal)?;

        Self::with_micronutrients(db, record).await
    }

    /// List foods; `search` matches name or brand case-insensitively
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<FoodResponse>, ApiError> {
        let records = FoodRepository::list(db, user_id, search)
            .await
            .map_err(ApiError::Internal)?;

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let micronutrients = FoodRepository::micronutrients_for(db, &ids)
            .await
            .map_err(ApiError::Internal)?;

        let mut by_food: HashMap<Uuid, Vec<FoodMicronutrientRecord>> = HashMap::new();
        for micro in micronutrients {
            by_food.entry(micro.food_id).or_default().push(micro);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let micros = by_food.remove(&record.id).unwrap_or_default();
                to_response(record, micros)
            })
            .collect())
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<FoodResponse, ApiError> {
        let record = require_owned::<FoodRecord>(db, id, user_id).await?;
        Self::with_micronutrients(db, record).await
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateFoodRequest,
    ) -> Result<FoodResponse, ApiError> {
        require_owned::<FoodRecord>(db, id, user_id).await?;

        let links = match &req.micronutrients {
            Some(inputs) => Some(Self::check_micronutrients(db, user_id, inputs).await?),
            None => None,
        };

        let changes = FoodChanges {
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            brand: req.brand.clone(),
            serving_size: opt_f64_to_dec(req.serving_size)?,
            serving_unit: req.serving_unit.clone(),
            calories: opt_f64_to_dec(req.calories)?,
            proteins: opt_f64_to_dec(req.proteins)?,
            carbohydrates: opt_f64_to_dec(req.carbohydrates)?,
            fats: opt_f64_to_dec(req.fats)?,
            fiber: opt_f64_to_dec(req.fiber)?,
            sodium: opt_f64_to_dec(req.sodium)?,
        };

        let record = FoodRepository::update(db, id, user_id, &changes, links.as_deref())
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Food not found".to_string()))?;

        Self::with_micronutrients(db, record).await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<FoodRecord>(db, id, user_id).await
    }

    /// Every linked micronutrient must be the user's own and listed once
    async fn check_micronutrients(
        db: &PgPool,
        user_id: Uuid,
        inputs: &[FoodMicronutrientInput],
    ) -> Result<Vec<NewFoodMicronutrient>, ApiError> {
        let ids: Vec<Uuid> = inputs.iter().map(|m| m.micronutrient_id).collect();
        ensure_distinct(&ids, "Each micronutrient may only be listed once per food")?;
        require_all_owned::<MicronutrientRecord>(db, &ids, user_id).await?;

        inputs
            .iter()
            .map(|m| {
                Ok(NewFoodMicronutrient {
                    micronutrient_id: m.micronutrient_id,
                    amount: f64_to_dec_scaled(m.amount, AMOUNT_SCALE)?,
                })
            })
            .collect()
    }

    async fn with_micronutrients(db: &PgPool, record: FoodRecord) -> Result<FoodResponse, ApiError> {
        let micros = FoodRepository::micronutrients_for(db, &[record.id])
            .await
            .map_err(ApiError::Internal)?;

        Ok(to_response(record, micros))
    }
}

fn to_response(record: FoodRecord, micronutrients: Vec<FoodMicronutrientRecord>) -> FoodResponse {
    FoodResponse {
        id: record.id,
        name: record.name,
        brand: record.brand,
        serving_size: dec_to_f64(record.serving_size),
        serving_unit: record.serving_unit,
        calories: dec_to_f64(record.calories),
        proteins: dec_to_f64(record.proteins),
        carbohydrates: dec_to_f64(record.carbohydrates),
        fats: dec_to_f64(record.fats),
        fiber: opt_dec_to_f64(record.fiber),
        sodium: opt_dec_to_f64(record.sodium),
        micronutrients: micronutrients
            .into_iter()
            .map(|m| FoodMicronutrientResponse {
                micronutrient_id: m.micronutrient_id,
                name: m.name,
                unit: m.unit,
                amount: dec_to_f64(m.amount),
            })
            .collect(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}
