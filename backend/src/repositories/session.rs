//! Training session repository
//!
//! Session exercise rows are stored copies, not references into the exercise
//! library, so logged history never changes when a plan does.

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const SESSION_COLUMNS: &str =
    "id, user_id, training_id, training_name, date, duration, notes, completed, created_at";

/// Training session record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub training_id: Option<Uuid>,
    pub training_name: String,
    pub date: DateTime<Utc>,
    pub duration: Option<i32>,
    pub notes: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl OwnedRecord for SessionRecord {
    const TABLE: &'static str = "training_sessions";
    const COLUMNS: &'static str = SESSION_COLUMNS;
    const LABEL: &'static str = "Training session";
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionExerciseRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: String,
    pub weight: Option<Decimal>,
    pub notes: Option<String>,
    pub completed: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub training_id: Uuid,
    pub training_name: String,
    /// `None` stamps the session with the current time
    pub date: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub notes: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionExercise {
    pub exercise_name: String,
    pub sets: i32,
    pub reps: String,
    pub weight: Option<Decimal>,
    pub notes: Option<String>,
    pub completed: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct SessionChanges {
    pub duration: Option<i32>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

pub struct SessionRepository;

impl SessionRepository {
    /// Log a session together with its exercise rows
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        session: &NewSession,
        exercises: &[NewSessionExercise],
    ) -> Result<SessionRecord> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO training_sessions (user_id, training_id, training_name, date, duration,
                                           notes, completed)
            VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6, $7)
            RETURNING {SESSION_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(user_id)
            .bind(session.training_id)
            .bind(&session.training_name)
            .bind(session.date)
            .bind(session.duration)
            .bind(session.notes.as_deref())
            .bind(session.completed)
            .fetch_one(&mut *tx)
            .await?;

        for exercise in exercises {
            sqlx::query(
                r#"
                INSERT INTO session_exercises (session_id, exercise_name, sets, reps, weight,
                                               notes, completed, sort_order)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(record.id)
            .bind(&exercise.exercise_name)
            .bind(exercise.sets)
            .bind(&exercise.reps)
            .bind(exercise.weight)
            .bind(exercise.notes.as_deref())
            .bind(exercise.completed)
            .bind(exercise.sort_order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    /// Most recent sessions of a user
    pub async fn list(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<SessionRecord>> {
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM training_sessions
            WHERE user_id = $1
            ORDER BY date DESC, id ASC
            LIMIT $2
            "#
        );

        let records = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Most recent sessions logged from one training
    pub async fn recent_for_training(
        pool: &PgPool,
        training_id: Uuid,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<SessionRecord>> {
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM training_sessions
            WHERE training_id = $1 AND user_id = $2
            ORDER BY date DESC, id ASC
            LIMIT $3
            "#
        );

        let records = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(training_id)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &SessionChanges,
    ) -> Result<Option<SessionRecord>> {
        let sql = format!(
            r#"
            UPDATE training_sessions SET
                duration = COALESCE($3, duration),
                notes = COALESCE($4, notes),
                completed = COALESCE($5, completed)
            WHERE id = $1 AND user_id = $2
            RETURNING {SESSION_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.duration)
            .bind(changes.notes.as_deref())
            .bind(changes.completed)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Exercise rows of the given sessions in logged order
    pub async fn exercises_for(
        pool: &PgPool,
        session_ids: &[Uuid],
    ) -> Result<Vec<SessionExerciseRecord>> {
        if session_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, SessionExerciseRecord>(
            r#"
            SELECT id, session_id, exercise_name, sets, reps, weight, notes, completed, sort_order
            FROM session_exercises
            WHERE session_id = ANY($1)
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(session_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
