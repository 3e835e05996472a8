//! Diet service
//!
//! A diet schedules meals either for every day or for a single weekday.

use super::nutrition::{DecimalTargets, NutritionService};
use super::{delete_owned, require_all_owned, require_owned};
use crate::convert::opt_f64_to_dec;
use crate::error::ApiError;
use crate::repositories::{
    DietFields, DietMealRecord, DietRecord, DietRepository, MealRecord, NewDietMeal,
};
use diet_tracker_shared::types::{
    AddMealToDietRequest, CreateDietRequest, DietMealResponse, DietNutritionResponse,
    DietResponse, UpdateDietRequest,
};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct DietService;

impl DietService {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateDietRequest,
    ) -> Result<DietResponse, ApiError> {
        let schedule = schedule_from_request(req);
        let meal_ids: Vec<Uuid> = schedule.iter().map(|m| m.meal_id).collect();
        require_all_owned::<MealRecord>(db, &meal_ids, user_id).await?;

        let fields = DietFields {
            name: Some(req.name.trim().to_string()),
            description: req.description.clone(),
            start_date: req.start_date,
            end_date: req.end_date,
            is_active: req.is_active,
            target_calories: opt_f64_to_dec(req.target_calories)?,
            target_proteins: opt_f64_to_dec(req.target_proteins)?,
            target_carbohydrates: opt_f64_to_dec(req.target_carbohydrates)?,
            target_fats: opt_f64_to_dec(req.target_fats)?,
        };

        let record = DietRepository::create(db, user_id, &fields, &schedule)
            .await
            .map_err(ApiError::Internal)?;

        tracing::debug!(diet_id = %record.id, meals = schedule.len(), "Diet created");

        Self::single(db, record).await
    }

    /// List diets, newest first
    pub async fn list(db: &PgPool, user_id: Uuid) -> Result<Vec<DietResponse>, ApiError> {
        let records = DietRepository::list(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Self::assemble(db, records).await
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<DietResponse, ApiError> {
        let record = require_owned::<DietRecord>(db, id, user_id).await?;
        Self::single(db, record).await
    }

    /// Totals over the scheduled meals, compared with the diet's targets
    pub async fn nutrition(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        day: Option<i16>,
    ) -> Result<DietNutritionResponse, ApiError> {
        let record = require_owned::<DietRecord>(db, id, user_id).await?;
        let targets = targets_of(&record);
        let totals = NutritionService::diet_totals(db, record.id, day).await?;

        Ok(DietNutritionResponse {
            diet_id: record.id,
            diet_name: record.name,
            description: record.description,
            day_of_week: day,
            totals: totals.rounded(),
            targets: targets.to_response(),
            difference: totals.difference(&targets),
        })
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateDietRequest,
    ) -> Result<DietResponse, ApiError> {
        let current = require_owned::<DietRecord>(db, id, user_id).await?;

        // A one-sided change must still leave a valid range
        let start = req.start_date.or(current.start_date);
        let end = req.end_date.or(current.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(ApiError::InvalidField {
                    field: "end_date".to_string(),
                    message: "End date must not be before start date".to_string(),
                });
            }
        }

        let changes = DietFields {
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            description: req.description.clone(),
            start_date: req.start_date,
            end_date: req.end_date,
            is_active: req.is_active,
            target_calories: opt_f64_to_dec(req.target_calories)?,
            target_proteins: opt_f64_to_dec(req.target_proteins)?,
            target_carbohydrates: opt_f64_to_dec(req.target_carbohydrates)?,
            target_fats: opt_f64_to_dec(req.target_fats)?,
        };

        let record = DietRepository::update(db, id, user_id, &changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Diet not found".to_string()))?;

        Self::single(db, record).await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<DietRecord>(db, id, user_id).await
    }

    pub async fn add_meal(
        db: &PgPool,
        user_id: Uuid,
        diet_id: Uuid,
        req: &AddMealToDietRequest,
    ) -> Result<DietMealResponse, ApiError> {
        require_owned::<DietRecord>(db, diet_id, user_id).await?;
        require_owned::<MealRecord>(db, req.meal_id, user_id).await?;

        let record = DietRepository::add_meal(
            db,
            diet_id,
            NewDietMeal {
                meal_id: req.meal_id,
                day_of_week: req.day_of_week,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(meal_response(record))
    }

    pub async fn remove_meal(
        db: &PgPool,
        user_id: Uuid,
        diet_id: Uuid,
        diet_meal_id: Uuid,
    ) -> Result<(), ApiError> {
        require_owned::<DietRecord>(db, diet_id, user_id).await?;

        let removed = DietRepository::remove_meal(db, diet_id, diet_meal_id)
            .await
            .map_err(ApiError::Internal)?;

        if !removed {
            return Err(ApiError::NotFound("Diet meal not found".to_string()));
        }

        Ok(())
    }

    async fn single(db: &PgPool, record: DietRecord) -> Result<DietResponse, ApiError> {
        Self::assemble(db, vec![record])
            .await?
            .pop()
            .ok_or_else(|| ApiError::NotFound("Diet not found".to_string()))
    }

    async fn assemble(db: &PgPool, records: Vec<DietRecord>) -> Result<Vec<DietResponse>, ApiError> {
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let meals = DietRepository::meals_for(db, &ids)
            .await
            .map_err(ApiError::Internal)?;

        let mut by_diet: HashMap<Uuid, Vec<DietMealResponse>> = HashMap::new();
        for meal in meals {
            by_diet.entry(meal.diet_id).or_default().push(meal_response(meal));
        }

        Ok(records
            .into_iter()
            .map(|record| DietResponse {
                targets: targets_of(&record).to_response(),
                meals: by_diet.remove(&record.id).unwrap_or_default(),
                id: record.id,
                name: record.name,
                description: record.description,
                start_date: record.start_date,
                end_date: record.end_date,
                is_active: record.is_active,
                created_at: record.created_at,
                updated_at: record.updated_at,
            })
            .collect())
    }
}

/// Every-day meals first, then the per-weekday entries in request order
fn schedule_from_request(req: &CreateDietRequest) -> Vec<NewDietMeal> {
    let every_day = req.meal_ids.iter().map(|meal_id| NewDietMeal {
        meal_id: *meal_id,
        day_of_week: None,
    });

    let per_day = req.days.iter().flat_map(|day| {
        day.meal_ids.iter().map(move |meal_id| NewDietMeal {
            meal_id: *meal_id,
            day_of_week: Some(day.day_of_week),
        })
    });

    every_day.chain(per_day).collect()
}

pub(crate) fn targets_of(record: &DietRecord) -> DecimalTargets {
    DecimalTargets {
        calories: record.target_calories,
        proteins: record.target_proteins,
        carbohydrates: record.target_carbohydrates,
        fats: record.target_fats,
    }
}

fn meal_response(record: DietMealRecord) -> DietMealResponse {
    DietMealResponse {
        id: record.id,
        meal_id: record.meal_id,
        meal_name: record.meal_name,
        day_of_week: record.day_of_week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diet_tracker_shared::types::DietDayInput;

    #[test]
    fn test_schedule_from_request() {
        let oats = Uuid::new_v4();
        let salad = Uuid::new_v4();
        let steak = Uuid::new_v4();

        let req = CreateDietRequest {
            name: "Cut".to_string(),
            description: None,
            start_date: None,
            end_date: None,
            is_active: None,
            target_calories: Some(2000.0),
            target_proteins: None,
            target_carbohydrates: None,
            target_fats: None,
            meal_ids: vec![oats],
            days: vec![
                DietDayInput {
                    day_of_week: 1,
                    meal_ids: vec![salad, steak],
                },
                DietDayInput {
                    day_of_week: 3,
                    meal_ids: vec![salad],
                },
            ],
        };

        let schedule = schedule_from_request(&req);

        assert_eq!(
            schedule,
            vec![
                NewDietMeal { meal_id: oats, day_of_week: None },
                NewDietMeal { meal_id: salad, day_of_week: Some(1) },
                NewDietMeal { meal_id: steak, day_of_week: Some(1) },
                NewDietMeal { meal_id: salad, day_of_week: Some(3) },
            ]
        );
    }

    #[test]
    fn test_empty_schedule() {
        let req = CreateDietRequest {
            name: "Maintenance".to_string(),
            description: None,
            start_date: None,
            end_date: None,
            is_active: Some(false),
            target_calories: None,
            target_proteins: None,
            target_carbohydrates: None,
            target_fats: None,
            meal_ids: vec![],
            days: vec![],
        };

        assert!(schedule_from_request(&req).is_empty());
    }
}
