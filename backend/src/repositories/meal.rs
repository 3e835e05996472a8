//! Meal repository
//!
//! Meals and their food lines. Food lines are always read joined with the
//! food row so responses can show the food name and serving without a
//! second lookup.

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const MEAL_COLUMNS: &str = "id, user_id, name, description, time, sort_order, created_at, updated_at";

/// Meal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub time: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for MealRecord {
    const TABLE: &'static str = "meals";
    const COLUMNS: &'static str = MEAL_COLUMNS;
    const LABEL: &'static str = "Meal";
}

/// A food line of a meal, joined with the food it references
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealFoodRecord {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub brand: Option<String>,
    pub serving_size: Decimal,
    pub serving_unit: String,
    pub quantity: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: Option<String>,
    pub time: Option<String>,
    pub sort_order: i32,
}

/// Partial meal update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub time: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewMealFood {
    pub food_id: Uuid,
    pub quantity: Decimal,
    pub notes: Option<String>,
}

pub struct MealRepository;

impl MealRepository {
    /// Create a meal together with its food lines
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        meal: &NewMeal,
        foods: &[NewMealFood],
    ) -> Result<MealRecord> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO meals (user_id, name, description, time, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEAL_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, MealRecord>(&sql)
            .bind(user_id)
            .bind(&meal.name)
            .bind(meal.description.as_deref())
            .bind(meal.time.as_deref())
            .bind(meal.sort_order)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_foods(&mut tx, record.id, foods).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// List meals ordered by their display order, then name
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<MealRecord>> {
        let sql = format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meals
            WHERE user_id = $1
            ORDER BY sort_order ASC, name ASC, id ASC
            "#
        );

        let records = sqlx::query_as::<_, MealRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Update a meal; a `Some` food list replaces every existing line
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &MealChanges,
        foods: Option<&[NewMealFood]>,
    ) -> Result<Option<MealRecord>> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE meals SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                time = COALESCE($5, time),
                sort_order = COALESCE($6, sort_order),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {MEAL_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, MealRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.time.as_deref())
            .bind(changes.sort_order)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        if let Some(foods) = foods {
            sqlx::query("DELETE FROM meal_foods WHERE meal_id = $1")
                .bind(record.id)
                .execute(&mut *tx)
                .await?;

            Self::insert_foods(&mut tx, record.id, foods).await?;
        }

        tx.commit().await?;

        Ok(Some(record))
    }

    /// Food lines of the given meals in insertion order
    pub async fn foods_for(pool: &PgPool, meal_ids: &[Uuid]) -> Result<Vec<MealFoodRecord>> {
        if meal_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, MealFoodRecord>(
            r#"
            SELECT mf.id, mf.meal_id, mf.food_id, f.name AS food_name, f.brand,
                   f.serving_size, f.serving_unit, mf.quantity, mf.notes
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

    /// Append a food line to a meal
    pub async fn add_food(pool: &PgPool, meal_id: Uuid, food: &NewMealFood) -> Result<MealFoodRecord> {
        let record = sqlx::query_as::<_, MealFoodRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO meal_foods (meal_id, food_id, quantity, notes)
                VALUES ($1, $2, $3, $4)
                RETURNING id, meal_id, food_id, quantity, notes
            )
            SELECT i.id, i.meal_id, i.food_id, f.name AS food_name, f.brand,
                   f.serving_size, f.serving_unit, i.quantity, i.notes
            FROM inserted i
            JOIN foods f ON f.id = i.food_id
            "#,
        )
        .bind(meal_id)
        .bind(food.food_id)
        .bind(food.quantity)
        .bind(food.notes.as_deref())
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Change the quantity and notes of a food line belonging to `meal_id`
    pub async fn update_food(
        pool: &PgPool,
        meal_id: Uuid,
        meal_food_id: Uuid,
        quantity: Decimal,
        notes: Option<&str>,
    ) -> Result<Option<MealFoodRecord>> {
        let record = sqlx::query_as::<_, MealFoodRecord>(
            r#"
            WITH updated AS (
                UPDATE meal_foods SET
                    quantity = $3,
                    notes = COALESCE($4, notes)
                WHERE id = $2 AND meal_id = $1
                RETURNING id, meal_id, food_id, quantity, notes
            )
            SELECT u.id, u.meal_id, u.food_id, f.name AS food_name, f.brand,
                   f.serving_size, f.serving_unit, u.quantity, u.notes
            FROM updated u
            JOIN foods f ON f.id = u.food_id
            "#,
        )
        .bind(meal_id)
        .bind(meal_food_id)
        .bind(quantity)
        .bind(notes)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn remove_food(pool: &PgPool, meal_id: Uuid, meal_food_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_foods WHERE id = $2 AND meal_id = $1")
            .bind(meal_id)
            .bind(meal_food_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_foods(
        tx: &mut Transaction<'_, Postgres>,
        meal_id: Uuid,
        foods: &[NewMealFood],
    ) -> Result<()> {
        for food in foods {
            sqlx::query(
                r#"
                INSERT INTO meal_foods (meal_id, food_id, quantity, notes)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(meal_id)
            .bind(food.food_id)
            .bind(food.quantity)
            .bind(food.notes.as_deref())
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
