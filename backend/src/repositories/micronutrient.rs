//! Micronutrient repository

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MicronutrientRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for MicronutrientRecord {
    const TABLE: &'static str = "micronutrients";
    const COLUMNS: &'static str = "id, user_id, name, unit, created_at, updated_at";
    const LABEL: &'static str = "Micronutrient";
}

pub struct MicronutrientRepository;

impl MicronutrientRepository {
    /// Insert a micronutrient; fails with a unique violation on a duplicate name
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        name: &str,
        unit: &str,
    ) -> Result<MicronutrientRecord> {
        let record = sqlx::query_as::<_, MicronutrientRecord>(
            r#"
            INSERT INTO micronutrients (user_id, name, unit)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, unit, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(unit)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<MicronutrientRecord>> {
        let records = sqlx::query_as::<_, MicronutrientRecord>(
            r#"
            SELECT id, user_id, name, unit, created_at, updated_at
            FROM micronutrients
            WHERE user_id = $1
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        name: Option<&str>,
        unit: Option<&str>,
    ) -> Result<Option<MicronutrientRecord>> {
        let record = sqlx::query_as::<_, MicronutrientRecord>(
            r#"
            UPDATE micronutrients SET
                name = COALESCE($3, name),
                unit = COALESCE($4, unit),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, unit, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(unit)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
