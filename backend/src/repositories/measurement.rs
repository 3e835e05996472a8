//! Body measurement repository

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use diet_tracker_shared::MeasurementField;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const MEASUREMENT_COLUMNS: &str = "id, user_id, date, weight, height, body_fat, muscle_mass, \
     chest, waist, hips, left_arm, right_arm, left_thigh, right_thigh, left_calf, right_calf, \
     shoulders, neck, notes, created_at";

/// Body measurement record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeasurementRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub weight: Option<Decimal>,
    pub height: Option<Decimal>,
    pub body_fat: Option<Decimal>,
    pub muscle_mass: Option<Decimal>,
    pub chest: Option<Decimal>,
    pub waist: Option<Decimal>,
    pub hips: Option<Decimal>,
    pub left_arm: Option<Decimal>,
    pub right_arm: Option<Decimal>,
    pub left_thigh: Option<Decimal>,
    pub right_thigh: Option<Decimal>,
    pub left_calf: Option<Decimal>,
    pub right_calf: Option<Decimal>,
    pub shoulders: Option<Decimal>,
    pub neck: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OwnedRecord for MeasurementRecord {
    const TABLE: &'static str = "body_measurements";
    const COLUMNS: &'static str = MEASUREMENT_COLUMNS;
    const LABEL: &'static str = "Body measurement";
}

/// Measurement values for inserts and partial updates
#[derive(Debug, Clone, Default)]
pub struct MeasurementValues {
    pub date: Option<DateTime<Utc>>,
    pub weight: Option<Decimal>,
    pub height: Option<Decimal>,
    pub body_fat: Option<Decimal>,
    pub muscle_mass: Option<Decimal>,
    pub chest: Option<Decimal>,
    pub waist: Option<Decimal>,
    pub hips: Option<Decimal>,
    pub left_arm: Option<Decimal>,
    pub right_arm: Option<Decimal>,
    pub left_thigh: Option<Decimal>,
    pub right_thigh: Option<Decimal>,
    pub left_calf: Option<Decimal>,
    pub right_calf: Option<Decimal>,
    pub shoulders: Option<Decimal>,
    pub neck: Option<Decimal>,
    pub notes: Option<String>,
}

/// One charted value of a measurement field
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressRecord {
    pub date: DateTime<Utc>,
    pub value: Decimal,
}

pub struct MeasurementRepository;

impl MeasurementRepository {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        values: &MeasurementValues,
    ) -> Result<MeasurementRecord> {
        let sql = format!(
            r#"
            INSERT INTO body_measurements (user_id, date, weight, height, body_fat, muscle_mass,
                chest, waist, hips, left_arm, right_arm, left_thigh, right_thigh, left_calf,
                right_calf, shoulders, neck, notes)
            VALUES ($1, COALESCE($2, NOW()), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18)
            RETURNING {MEASUREMENT_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, MeasurementRecord>(&sql)
            .bind(user_id)
            .bind(values.date)
            .bind(values.weight)
            .bind(values.height)
            .bind(values.body_fat)
            .bind(values.muscle_mass)
            .bind(values.chest)
            .bind(values.waist)
            .bind(values.hips)
            .bind(values.left_arm)
            .bind(values.right_arm)
            .bind(values.left_thigh)
            .bind(values.right_thigh)
            .bind(values.left_calf)
            .bind(values.right_calf)
            .bind(values.shoulders)
            .bind(values.neck)
            .bind(values.notes.as_deref())
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    /// Measurements newest first, optionally capped
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<MeasurementRecord>> {
        let sql = format!(
            r#"
            SELECT {MEASUREMENT_COLUMNS}
            FROM body_measurements
            WHERE user_id = $1
            ORDER BY date DESC, id ASC
            LIMIT $2
            "#
        );

        let records = sqlx::query_as::<_, MeasurementRecord>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn latest(pool: &PgPool, user_id: Uuid) -> Result<Option<MeasurementRecord>> {
        let sql = format!(
            r#"
            SELECT {MEASUREMENT_COLUMNS}
            FROM body_measurements
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            "#
        );

        let record = sqlx::query_as::<_, MeasurementRecord>(&sql)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn oldest(pool: &PgPool, user_id: Uuid) -> Result<Option<MeasurementRecord>> {
        let sql = format!(
            r#"
            SELECT {MEASUREMENT_COLUMNS}
            FROM body_measurements
            WHERE user_id = $1
            ORDER BY date ASC, created_at ASC
            LIMIT 1
            "#
        );

        let record = sqlx::query_as::<_, MeasurementRecord>(&sql)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &MeasurementValues,
    ) -> Result<Option<MeasurementRecord>> {
        let sql = format!(
            r#"
            UPDATE body_measurements SET
                date = COALESCE($3, date),
                weight = COALESCE($4, weight),
                height = COALESCE($5, height),
                body_fat = COALESCE($6, body_fat),
                muscle_mass = COALESCE($7, muscle_mass),
                chest = COALESCE($8, chest),
                waist = COALESCE($9, waist),
                hips = COALESCE($10, hips),
                left_arm = COALESCE($11, left_arm),
                right_arm = COALESCE($12, right_arm),
                left_thigh = COALESCE($13, left_thigh),
                right_thigh = COALESCE($14, right_thigh),
                left_calf = COALESCE($15, left_calf),
                right_calf = COALESCE($16, right_calf),
                shoulders = COALESCE($17, shoulders),
                neck = COALESCE($18, neck),
                notes = COALESCE($19, notes)
            WHERE id = $1 AND user_id = $2
            RETURNING {MEASUREMENT_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, MeasurementRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.date)
            .bind(changes.weight)
            .bind(changes.height)
            .bind(changes.body_fat)
            .bind(changes.muscle_mass)
            .bind(changes.chest)
            .bind(changes.waist)
            .bind(changes.hips)
            .bind(changes.left_arm)
            .bind(changes.right_arm)
            .bind(changes.left_thigh)
            .bind(changes.right_thigh)
            .bind(changes.left_calf)
            .bind(changes.right_calf)
            .bind(changes.shoulders)
            .bind(changes.neck)
            .bind(changes.notes.as_deref())
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// The most recent `limit` non-null values of one field, oldest first
    pub async fn progress(
        pool: &PgPool,
        user_id: Uuid,
        field: MeasurementField,
        limit: i64,
    ) -> Result<Vec<ProgressRecord>> {
        // The column comes from a closed enum, never from request text
        let column = field.column();
        let sql = format!(
            r#"
            SELECT date, {column} AS value
            FROM body_measurements
            WHERE user_id = $1 AND {column} IS NOT NULL
            ORDER BY date DESC, id ASC
            LIMIT $2
            "#
        );

        let mut records = sqlx::query_as::<_, ProgressRecord>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        records.reverse();

        Ok(records)
    }
}
