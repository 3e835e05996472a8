//! Diet repository

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const DIET_COLUMNS: &str = "id, user_id, name, description, start_date, end_date, is_active, \
     target_calories, target_proteins, target_carbohydrates, target_fats, created_at, updated_at";

/// Diet record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DietRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub target_calories: Option<Decimal>,
    pub target_proteins: Option<Decimal>,
    pub target_carbohydrates: Option<Decimal>,
    pub target_fats: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for DietRecord {
    const TABLE: &'static str = "diets";
    const COLUMNS: &'static str = DIET_COLUMNS;
    const LABEL: &'static str = "Diet";
}

/// Scheduled meal of a diet, joined with the meal name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DietMealRecord {
    pub id: Uuid,
    pub diet_id: Uuid,
    pub meal_id: Uuid,
    pub meal_name: String,
    pub day_of_week: Option<i16>,
}

/// Scalar diet fields, used for inserts and for partial updates
#[derive(Debug, Clone, Default)]
pub struct DietFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub target_calories: Option<Decimal>,
    pub target_proteins: Option<Decimal>,
    pub target_carbohydrates: Option<Decimal>,
    pub target_fats: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDietMeal {
    pub meal_id: Uuid,
    /// `None` schedules the meal for every day
    pub day_of_week: Option<i16>,
}

pub struct DietRepository;

impl DietRepository {
    /// Create a diet with its meal schedule; `fields.name` must be set
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        fields: &DietFields,
        meals: &[NewDietMeal],
    ) -> Result<DietRecord> {
        let name = fields
            .name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("diet name is required"))?;

        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO diets (user_id, name, description, start_date, end_date, is_active,
                               target_calories, target_proteins, target_carbohydrates, target_fats)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE), $7, $8, $9, $10)
            RETURNING {DIET_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, DietRecord>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(fields.description.as_deref())
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(fields.is_active)
            .bind(fields.target_calories)
            .bind(fields.target_proteins)
            .bind(fields.target_carbohydrates)
            .bind(fields.target_fats)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_meals(&mut tx, record.id, meals).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// List diets, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<DietRecord>> {
        let sql = format!(
            r#"
            SELECT {DIET_COLUMNS}
            FROM diets
            WHERE user_id = $1
            ORDER BY created_at DESC, id ASC
            "#
        );

        let records = sqlx::query_as::<_, DietRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &DietFields,
    ) -> Result<Option<DietRecord>> {
        let sql = format!(
            r#"
            UPDATE diets SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                is_active = COALESCE($7, is_active),
                target_calories = COALESCE($8, target_calories),
                target_proteins = COALESCE($9, target_proteins),
                target_carbohydrates = COALESCE($10, target_carbohydrates),
                target_fats = COALESCE($11, target_fats),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {DIET_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, DietRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.start_date)
            .bind(changes.end_date)
            .bind(changes.is_active)
            .bind(changes.target_calories)
            .bind(changes.target_proteins)
            .bind(changes.target_carbohydrates)
            .bind(changes.target_fats)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Meal schedule of the given diets; every-day meals first, then by weekday
    pub async fn meals_for(pool: &PgPool, diet_ids: &[Uuid]) -> Result<Vec<DietMealRecord>> {
        if diet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, DietMealRecord>(
            r#"
            SELECT dm.id, dm.diet_id, dm.meal_id, m.name AS meal_name, dm.day_of_week
            FROM diet_meals dm
            JOIN meals m ON m.id = dm.meal_id
            WHERE dm.diet_id = ANY($1)
            ORDER BY dm.day_of_week ASC NULLS FIRST, m.sort_order ASC, dm.created_at ASC, dm.id ASC
            "#,
        )
        .bind(diet_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn add_meal(pool: &PgPool, diet_id: Uuid, meal: NewDietMeal) -> Result<DietMealRecord> {
        let record = sqlx::query_as::<_, DietMealRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO diet_meals (diet_id, meal_id, day_of_week)
                VALUES ($1, $2, $3)
                RETURNING id, diet_id, meal_id, day_of_week
            )
            SELECT i.id, i.diet_id, i.meal_id, m.name AS meal_name, i.day_of_week
            FROM inserted i
            JOIN meals m ON m.id = i.meal_id
            "#,
        )
        .bind(diet_id)
        .bind(meal.meal_id)
        .bind(meal.day_of_week)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn remove_meal(pool: &PgPool, diet_id: Uuid, diet_meal_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM diet_meals WHERE id = $2 AND diet_id = $1")
            .bind(diet_id)
            .bind(diet_meal_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_meals(
        tx: &mut Transaction<'_, Postgres>,
        diet_id: Uuid,
        meals: &[NewDietMeal],
    ) -> Result<()> {
        for meal in meals {
            sqlx::query(
                r#"
                INSERT INTO diet_meals (diet_id, meal_id, day_of_week)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(diet_id)
            .bind(meal.meal_id)
            .bind(meal.day_of_week)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
