//! Exercise library repository

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const EXERCISE_COLUMNS: &str = "id, user_id, name, description, muscle_group, equipment, \
     instructions, video_url, created_at, updated_at";

/// Exercise record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for ExerciseRecord {
    const TABLE: &'static str = "exercises";
    const COLUMNS: &'static str = EXERCISE_COLUMNS;
    const LABEL: &'static str = "Exercise";
}

/// Exercise fields; on update `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ExerciseFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
}

/// Exercise repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    /// Create a new exercise
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        name: &str,
        fields: &ExerciseFields,
    ) -> Result<ExerciseRecord> {
        let sql = format!(
            r#"
            INSERT INTO exercises (user_id, name, description, muscle_group, equipment,
                                   instructions, video_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EXERCISE_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, ExerciseRecord>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(fields.description.as_deref())
            .bind(fields.muscle_group.as_deref())
            .bind(fields.equipment.as_deref())
            .bind(fields.instructions.as_deref())
            .bind(fields.video_url.as_deref())
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    /// List exercises by name, optionally for one muscle group
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        muscle_group: Option<&str>,
    ) -> Result<Vec<ExerciseRecord>> {
        let sql = format!(
            r#"
            SELECT {EXERCISE_COLUMNS}
            FROM exercises
            WHERE user_id = $1
              AND ($2::text IS NULL OR muscle_group = $2)
            ORDER BY name ASC, id ASC
            "#
        );

        let records = sqlx::query_as::<_, ExerciseRecord>(&sql)
            .bind(user_id)
            .bind(muscle_group)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &ExerciseFields,
    ) -> Result<Option<ExerciseRecord>> {
        let sql = format!(
            r#"
            UPDATE exercises SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                muscle_group = COALESCE($5, muscle_group),
                equipment = COALESCE($6, equipment),
                instructions = COALESCE($7, instructions),
                video_url = COALESCE($8, video_url),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {EXERCISE_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, ExerciseRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.muscle_group.as_deref())
            .bind(changes.equipment.as_deref())
            .bind(changes.instructions.as_deref())
            .bind(changes.video_url.as_deref())
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Distinct muscle groups in use, sorted
    pub async fn muscle_groups(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>> {
        let groups = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT muscle_group
            FROM exercises
            WHERE user_id = $1 AND muscle_group IS NOT NULL
            ORDER BY muscle_group ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(groups)
    }
}
