//! Nutrition repository - loads the food lines nutrition totals are computed from
//!
//! Every row is one (food, quantity) contribution together with the food's
//! per-serving values. Diet rows are produced per scheduled meal, so a meal
//! that appears on several days contributes once per appearance.

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// One food contribution with the values needed to scale it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NutritionLineRecord {
    /// Meal the line belongs to
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub quantity: Decimal,
    pub serving_size: Decimal,
    pub calories: Decimal,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub fiber: Option<Decimal>,
    pub sodium: Option<Decimal>,
}

pub struct NutritionRepository;

impl NutritionRepository {
    /// Food lines of the given meals
    pub async fn meal_lines(pool: &PgPool, meal_ids: &[Uuid]) -> Result<Vec<NutritionLineRecord>> {
        if meal_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, NutritionLineRecord>(
            r#"
            SELECT mf.meal_id, f.id AS food_id, f.name AS food_name, mf.quantity, f.serving_size,
                   f.calories, f.proteins, f.carbohydrates, f.fats, f.fiber, f.sodium
            FROM meal_foods mf
            JOIN foods f ON f.id = mf.food_id
            WHERE mf.meal_id = ANY($1)
            ORDER BY mf.created_at ASC, mf.id ASC
            "#,
        )
        .bind(meal_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Food lines of every scheduled meal of a diet
    ///
    /// With `day`, only meals scheduled for that weekday or for every day are included.
    pub async fn diet_lines(
        pool: &PgPool,
        diet_id: Uuid,
        day: Option<i16>,
    ) -> Result<Vec<NutritionLineRecord>> {
        let records = sqlx::query_as::<_, NutritionLineRecord>(
            r#"
            SELECT mf.meal_id, f.id AS food_id, f.name AS food_name, mf.quantity, f.serving_size,
                   f.calories, f.proteins, f.carbohydrates, f.fats, f.fiber, f.sodium
            FROM diet_meals dm
            JOIN meal_foods mf ON mf.meal_id = dm.meal_id
            JOIN foods f ON f.id = mf.food_id
            WHERE dm.diet_id = $1
              AND ($2::smallint IS NULL OR dm.day_of_week IS NULL OR dm.day_of_week = $2)
            ORDER BY dm.day_of_week ASC NULLS FIRST, dm.id ASC, mf.id ASC
            "#,
        )
        .bind(diet_id)
        .bind(day)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
