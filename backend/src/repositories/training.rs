//! Training program repository
//!
//! A training is an ordered plan of exercises. Plan lines are read joined with
//! the exercise library so responses carry the exercise name.

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const TRAINING_COLUMNS: &str = "id, user_id, name, description, training_type, is_active, \
     day_of_week, duration, created_at, updated_at";

/// Training record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrainingRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub training_type: Option<String>,
    pub is_active: bool,
    pub day_of_week: Option<i16>,
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for TrainingRecord {
    const TABLE: &'static str = "trainings";
    const COLUMNS: &'static str = TRAINING_COLUMNS;
    const LABEL: &'static str = "Training";
}

/// Plan line of a training joined with its exercise
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrainingExerciseRecord {
    pub id: Uuid,
    pub training_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub muscle_group: Option<String>,
    pub sets: i32,
    pub reps: String,
    pub rest_seconds: Option<i32>,
    pub weight: Option<Decimal>,
    pub notes: Option<String>,
    pub sort_order: i32,
}

/// Scalar training fields, used for inserts and partial updates
#[derive(Debug, Clone, Default)]
pub struct TrainingFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub training_type: Option<String>,
    pub is_active: Option<bool>,
    pub day_of_week: Option<i16>,
    pub duration: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewTrainingExercise {
    pub exercise_id: Uuid,
    pub sets: i32,
    pub reps: String,
    pub rest_seconds: Option<i32>,
    pub weight: Option<Decimal>,
    pub notes: Option<String>,
    /// `None` appends after the current last line
    pub sort_order: Option<i32>,
}

/// Partial update of a plan line
#[derive(Debug, Clone, Default)]
pub struct TrainingExerciseChanges {
    pub sets: Option<i32>,
    pub reps: Option<String>,
    pub rest_seconds: Option<i32>,
    pub weight: Option<Decimal>,
    pub notes: Option<String>,
    pub sort_order: Option<i32>,
}

/// Number of sessions logged from a training
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionCountRecord {
    pub training_id: Uuid,
    pub session_count: i64,
}

const EXERCISE_LINE_SELECT: &str = r#"
    SELECT te.id, te.training_id, te.exercise_id, e.name AS exercise_name, e.muscle_group,
           te.sets, te.reps, te.rest_seconds, te.weight, te.notes, te.sort_order
"#;

pub struct TrainingRepository;

impl TrainingRepository {
    /// Create a training and its plan; lines without an order take their list position
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        fields: &TrainingFields,
        exercises: &[NewTrainingExercise],
    ) -> Result<TrainingRecord> {
        let name = fields
            .name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("training name is required"))?;

        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO trainings (user_id, name, description, training_type, is_active,
                                   day_of_week, duration)
            VALUES ($1, $2, $3, $4, COALESCE($5, TRUE), $6, $7)
            RETURNING {TRAINING_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, TrainingRecord>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(fields.description.as_deref())
            .bind(fields.training_type.as_deref())
            .bind(fields.is_active)
            .bind(fields.day_of_week)
            .bind(fields.duration)
            .fetch_one(&mut *tx)
            .await?;

        for (index, exercise) in exercises.iter().enumerate() {
            let sort_order = exercise.sort_order.unwrap_or(index as i32);
            Self::insert_exercise(&mut tx, record.id, exercise, sort_order).await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    /// List trainings, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<TrainingRecord>> {
        let sql = format!(
            r#"
            SELECT {TRAINING_COLUMNS}
            FROM trainings
            WHERE user_id = $1
            ORDER BY created_at DESC, id ASC
            "#
        );

        let records = sqlx::query_as::<_, TrainingRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &TrainingFields,
    ) -> Result<Option<TrainingRecord>> {
        let sql = format!(
            r#"
            UPDATE trainings SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                training_type = COALESCE($5, training_type),
                is_active = COALESCE($6, is_active),
                day_of_week = COALESCE($7, day_of_week),
                duration = COALESCE($8, duration),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TRAINING_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, TrainingRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.training_type.as_deref())
            .bind(changes.is_active)
            .bind(changes.day_of_week)
            .bind(changes.duration)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Plan lines of the given trainings in plan order
    pub async fn exercises_for(
        pool: &PgPool,
        training_ids: &[Uuid],
    ) -> Result<Vec<TrainingExerciseRecord>> {
        if training_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            {EXERCISE_LINE_SELECT}
            FROM training_exercises te
            JOIN exercises e ON e.id = te.exercise_id
            WHERE te.training_id = ANY($1)
            ORDER BY te.sort_order ASC, te.id ASC
            "#
        );

        let records = sqlx::query_as::<_, TrainingExerciseRecord>(&sql)
            .bind(training_ids)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Logged session count per training; trainings without sessions are absent
    pub async fn session_counts(
        pool: &PgPool,
        training_ids: &[Uuid],
    ) -> Result<Vec<SessionCountRecord>> {
        if training_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, SessionCountRecord>(
            r#"
            SELECT training_id, COUNT(*) AS session_count
            FROM training_sessions
            WHERE training_id = ANY($1)
            GROUP BY training_id
            "#,
        )
        .bind(training_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Add a line to a training's plan
    pub async fn add_exercise(
        pool: &PgPool,
        training_id: Uuid,
        exercise: &NewTrainingExercise,
    ) -> Result<TrainingExerciseRecord> {
        let mut tx = pool.begin().await?;

        let sort_order = match exercise.sort_order {
            Some(order) => order,
            None => {
                sqlx::query_scalar::<_, i32>(
                    r#"
                    SELECT COALESCE(MAX(sort_order) + 1, 0)
                    FROM training_exercises
                    WHERE training_id = $1
                    "#,
                )
                .bind(training_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        let id = Self::insert_exercise(&mut tx, training_id, exercise, sort_order).await?;

        let sql = format!(
            r#"
            {EXERCISE_LINE_SELECT}
            FROM training_exercises te
            JOIN exercises e ON e.id = te.exercise_id
            WHERE te.id = $1
            "#
        );

        let record = sqlx::query_as::<_, TrainingExerciseRecord>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Update a plan line belonging to `training_id`
    pub async fn update_exercise(
        pool: &PgPool,
        training_id: Uuid,
        line_id: Uuid,
        changes: &TrainingExerciseChanges,
    ) -> Result<Option<TrainingExerciseRecord>> {
        let sql = format!(
            r#"
            WITH te AS (
                UPDATE training_exercises SET
                    sets = COALESCE($3, sets),
                    reps = COALESCE($4, reps),
                    rest_seconds = COALESCE($5, rest_seconds),
                    weight = COALESCE($6, weight),
                    notes = COALESCE($7, notes),
                    sort_order = COALESCE($8, sort_order)
                WHERE id = $2 AND training_id = $1
                RETURNING *
            )
            {EXERCISE_LINE_SELECT}
            FROM te
            JOIN exercises e ON e.id = te.exercise_id
            "#
        );

        let record = sqlx::query_as::<_, TrainingExerciseRecord>(&sql)
            .bind(training_id)
            .bind(line_id)
            .bind(changes.sets)
            .bind(changes.reps.as_deref())
            .bind(changes.rest_seconds)
            .bind(changes.weight)
            .bind(changes.notes.as_deref())
            .bind(changes.sort_order)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn remove_exercise(pool: &PgPool, training_id: Uuid, line_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_exercises WHERE id = $2 AND training_id = $1")
            .bind(training_id)
            .bind(line_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_exercise(
        tx: &mut Transaction<'_, Postgres>,
        training_id: Uuid,
        exercise: &NewTrainingExercise,
        sort_order: i32,
    ) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO training_exercises (training_id, exercise_id, sets, reps, rest_seconds,
                                            weight, notes, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(training_id)
        .bind(exercise.exercise_id)
        .bind(exercise.sets)
        .bind(&exercise.reps)
        .bind(exercise.rest_seconds)
        .bind(exercise.weight)
        .bind(exercise.notes.as_deref())
        .bind(sort_order)
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }
}
