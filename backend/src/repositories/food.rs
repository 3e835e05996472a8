//! Food repository
//!
//! Foods and their per-serving micronutrient amounts. Writes that touch the
//! micronutrient links run in one transaction with the food row.

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const FOOD_COLUMNS: &str = "id, user_id, name, brand, serving_size, serving_unit, calories, \
     proteins, carbohydrates, fats, fiber, sodium, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub serving_size: Decimal,
    pub serving_unit: String,
    pub calories: Decimal,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub fiber: Option<Decimal>,
    pub sodium: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for FoodRecord {
    const TABLE: &'static str = "foods";
    const COLUMNS: &'static str = FOOD_COLUMNS;
    const LABEL: &'static str = "Food";
}

/// Micronutrient amount of a food, joined with the micronutrient's name and unit
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodMicronutrientRecord {
    pub food_id: Uuid,
    pub micronutrient_id: Uuid,
    pub name: String,
    pub unit: String,
    pub amount: Decimal,
}

/// Input for creating a food
#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub brand: Option<String>,
    pub serving_size: Decimal,
    pub serving_unit: String,
    pub calories: Decimal,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub fiber: Option<Decimal>,
    pub sodium: Option<Decimal>,
}

/// Partial food update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct FoodChanges {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub serving_size: Option<Decimal>,
    pub serving_unit: Option<String>,
    pub calories: Option<Decimal>,
    pub proteins: Option<Decimal>,
    pub carbohydrates: Option<Decimal>,
    pub fats: Option<Decimal>,
    pub fiber: Option<Decimal>,
    pub sodium: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewFoodMicronutrient {
    pub micronutrient_id: Uuid,
    pub amount: Decimal,
}

pub struct FoodRepository;

impl FoodRepository {
    /// Create a food together with its micronutrient links
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        food: &NewFood,
        micronutrients: &[NewFoodMicronutrient],
    ) -> Result<FoodRecord> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO foods (user_id, name, brand, serving_size, serving_unit, calories,
                               proteins, carbohydrates, fats, fiber, sodium)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {FOOD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, FoodRecord>(&sql)
            .bind(user_id)
            .bind(&food.name)
            .bind(food.brand.as_deref())
            .bind(food.serving_size)
            .bind(&food.serving_unit)
            .bind(food.calories)
            .bind(food.proteins)
            .bind(food.carbohydrates)
            .bind(food.fats)
            .bind(food.fiber)
            .bind(food.sodium)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_micronutrients(&mut tx, record.id, micronutrients).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// List foods, optionally filtered by a case-insensitive match on name or brand
    pub async fn list(pool: &PgPool, user_id: Uuid, search: Option<&str>) -> Result<Vec<FoodRecord>> {
        let pattern = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| format!("%{}%", escape_like(term)));

        let sql = format!(
            r#"
            SELECT {FOOD_COLUMNS}
            FROM foods
            WHERE user_id = $1
              AND ($2::text IS NULL OR name ILIKE $2 OR brand ILIKE $2)
            ORDER BY name ASC, id ASC
            "#
        );

        let records = sqlx::query_as::<_, FoodRecord>(&sql)
            .bind(user_id)
            .bind(pattern)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Update a food; a `Some` micronutrient list replaces all existing links
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &FoodChanges,
        micronutrients: Option<&[NewFoodMicronutrient]>,
    ) -> Result<Option<FoodRecord>> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE foods SET
                name = COALESCE($3, name),
                brand = COALESCE($4, brand),
                serving_size = COALESCE($5, serving_size),
                serving_unit = COALESCE($6, serving_unit),
                calories = COALESCE($7, calories),
                proteins = COALESCE($8, proteins),
                carbohydrates = COALESCE($9, carbohydrates),
                fats = COALESCE($10, fats),
                fiber = COALESCE($11, fiber),
                sodium = COALESCE($12, sodium),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {FOOD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, FoodRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.name.as_deref())
            .bind(changes.brand.as_deref())
            .bind(changes.serving_size)
            .bind(changes.serving_unit.as_deref())
            .bind(changes.calories)
            .bind(changes.proteins)
            .bind(changes.carbohydrates)
            .bind(changes.fats)
            .bind(changes.fiber)
            .bind(changes.sodium)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        if let Some(micronutrients) = micronutrients {
            sqlx::query("DELETE FROM food_micronutrients WHERE food_id = $1")
                .bind(record.id)
                .execute(&mut *tx)
                .await?;

            Self::insert_micronutrients(&mut tx, record.id, micronutrients).await?;
        }

        tx.commit().await?;

        Ok(Some(record))
    }

    /// Micronutrient amounts for a set of foods, ordered by micronutrient name
    pub async fn micronutrients_for(
        pool: &PgPool,
        food_ids: &[Uuid],
    ) -> Result<Vec<FoodMicronutrientRecord>> {
        if food_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, FoodMicronutrientRecord>(
            r#"
            SELECT fm.food_id, fm.micronutrient_id, m.name, m.unit, fm.amount
            FROM food_micronutrients fm
            JOIN micronutrients m ON m.id = fm.micronutrient_id
            WHERE fm.food_id = ANY($1)
            ORDER BY m.name ASC, fm.id ASC
            "#,
        )
        .bind(food_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    async fn insert_micronutrients(
        tx: &mut Transaction<'_, Postgres>,
        food_id: Uuid,
        micronutrients: &[NewFoodMicronutrient],
    ) -> Result<()> {
        for link in micronutrients {
            sqlx::query(
                r#"
                INSERT INTO food_micronutrients (food_id, micronutrient_id, amount)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(food_id)
            .bind(link.micronutrient_id)
            .bind(link.amount)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

/// Escape LIKE wildcards so user input only matches literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
