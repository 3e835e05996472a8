//! Training session logging
//!
//! A session copies its exercise list at creation time, either from the
//! request or from the training's current plan. The copy is never linked
//! back, so later plan edits leave logged history untouched.

use super::{delete_owned, require_owned};
use crate::convert::{opt_dec_to_f64, opt_f64_to_dec};
use crate::error::ApiError;
use crate::repositories::{
    NewSession, NewSessionExercise, SessionChanges, SessionExerciseRecord, SessionRecord,
    SessionRepository, TrainingExerciseRecord, TrainingRecord, TrainingRepository,
};
use diet_tracker_shared::types::{
    CreateSessionRequest, SessionExerciseInput, SessionExerciseResponse, SessionResponse,
    UpdateSessionRequest,
};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Default number of sessions returned by the list endpoint
pub const DEFAULT_SESSION_LIMIT: i64 = 20;
/// Upper bound for the list endpoint's `limit`
pub const MAX_SESSION_LIMIT: i64 = 100;

pub struct SessionService;

impl SessionService {
    /// Log a session of an owned training
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        training_id: Uuid,
        req: &CreateSessionRequest,
    ) -> Result<SessionResponse, ApiError> {
        let training = require_owned::<TrainingRecord>(db, training_id, user_id).await?;

        let exercises = match req.exercises.as_deref() {
            Some(inputs) if !inputs.is_empty() => explicit_exercises(inputs)?,
            _ => {
                let plan = TrainingRepository::exercises_for(db, &[training.id])
                    .await
                    .map_err(ApiError::Internal)?;
                snapshot_plan(&plan)
            }
        };

        let session = NewSession {
            training_id: training.id,
            training_name: training.name,
            date: req.date,
            duration: req.duration,
            notes: req.notes.clone(),
            completed: req.completed.unwrap_or(false),
        };

        let record = SessionRepository::create(db, user_id, &session, &exercises)
            .await
            .map_err(ApiError::Internal)?;

        tracing::info!(
            session_id = %record.id,
            training_id = %training_id,
            exercises = exercises.len(),
            "Training session logged"
        );

        Self::single(db, record).await
    }

    /// Most recent sessions, newest first
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<SessionResponse>, ApiError> {
        let limit = clamp_limit(limit);
        let records = SessionRepository::list(db, user_id, limit)
            .await
            .map_err(ApiError::Internal)?;

        Self::assemble(db, records).await
    }

    pub async fn recent_for_training(
        db: &PgPool,
        user_id: Uuid,
        training_id: Uuid,
        limit: i64,
    ) -> Result<Vec<SessionResponse>, ApiError> {
        let records = SessionRepository::recent_for_training(db, training_id, user_id, limit)
            .await
            .map_err(ApiError::Internal)?;

        Self::assemble(db, records).await
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<SessionResponse, ApiError> {
        let record = require_owned::<SessionRecord>(db, id, user_id).await?;
        Self::single(db, record).await
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateSessionRequest,
    ) -> Result<SessionResponse, ApiError> {
        let changes = SessionChanges {
            duration: req.duration,
            notes: req.notes.clone(),
            completed: req.completed,
        };

        let record = SessionRepository::update(db, id, user_id, &changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Training session not found".to_string()))?;

        Self::single(db, record).await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<SessionRecord>(db, id, user_id).await
    }

    async fn single(db: &PgPool, record: SessionRecord) -> Result<SessionResponse, ApiError> {
        Self::assemble(db, vec![record])
            .await?
            .pop()
            .ok_or_else(|| ApiError::NotFound("Training session not found".to_string()))
    }

    async fn assemble(
        db: &PgPool,
        records: Vec<SessionRecord>,
    ) -> Result<Vec<SessionResponse>, ApiError> {
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let exercises = SessionRepository::exercises_for(db, &ids)
            .await
            .map_err(ApiError::Internal)?;

        let mut by_session: HashMap<Uuid, Vec<SessionExerciseResponse>> = HashMap::new();
        for exercise in exercises {
            by_session
                .entry(exercise.session_id)
                .or_default()
                .push(exercise_response(exercise));
        }

        Ok(records
            .into_iter()
            .map(|record| SessionResponse {
                exercises: by_session.remove(&record.id).unwrap_or_default(),
                id: record.id,
                training_id: record.training_id,
                training_name: record.training_name,
                date: record.date,
                duration: record.duration,
                notes: record.notes,
                completed: record.completed,
                created_at: record.created_at,
            })
            .collect())
    }
}

/// Copy a training plan into session rows, keeping the plan order
pub fn snapshot_plan(plan: &[TrainingExerciseRecord]) -> Vec<NewSessionExercise> {
    plan.iter()
        .map(|line| NewSessionExercise {
            exercise_name: line.exercise_name.clone(),
            sets: line.sets,
            reps: line.reps.clone(),
            weight: line.weight,
            notes: line.notes.clone(),
            completed: false,
            sort_order: line.sort_order,
        })
        .collect()
}

/// Session rows given explicitly, ordered by their position in the request
pub fn explicit_exercises(
    inputs: &[SessionExerciseInput],
) -> Result<Vec<NewSessionExercise>, ApiError> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            Ok(NewSessionExercise {
                exercise_name: input.exercise_name.trim().to_string(),
                sets: input.sets,
                reps: input.reps.clone(),
                weight: opt_f64_to_dec(input.weight)?,
                notes: input.notes.clone(),
                completed: input.completed.unwrap_or(false),
                sort_order: index as i32,
            })
        })
        .collect()
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_SESSION_LIMIT)
        .clamp(1, MAX_SESSION_LIMIT)
}

fn exercise_response(record: SessionExerciseRecord) -> SessionExerciseResponse {
    SessionExerciseResponse {
        id: record.id,
        exercise_name: record.exercise_name,
        sets: record.sets,
        reps: record.reps,
        weight: opt_dec_to_f64(record.weight),
        notes: record.notes,
        completed: record.completed,
        order: record.sort_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn plan_line(name: &str, sort_order: i32) -> TrainingExerciseRecord {
        TrainingExerciseRecord {
            id: Uuid::new_v4(),
            training_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            exercise_name: name.to_string(),
            muscle_group: Some("Chest".to_string()),
            sets: 4,
            reps: "8-10".to_string(),
            rest_seconds: Some(90),
            weight: Some(Decimal::new(625, 1)),
            notes: Some("slow negatives".to_string()),
            sort_order,
        }
    }

    #[test]
    fn test_snapshot_copies_plan_values() {
        let plan = vec![plan_line("Bench press", 0), plan_line("Dips", 1)];

        let rows = snapshot_plan(&plan);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].exercise_name, "Bench press");
        assert_eq!(rows[0].sets, 4);
        assert_eq!(rows[0].reps, "8-10");
        assert_eq!(rows[0].weight, Some(Decimal::new(625, 1)));
        assert_eq!(rows[1].sort_order, 1);
        assert!(rows.iter().all(|row| !row.completed));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_plan_edits() {
        let mut plan = vec![plan_line("Squat", 0)];
        let rows = snapshot_plan(&plan);

        plan[0].exercise_name = "Front squat".to_string();
        plan[0].sets = 5;

        assert_eq!(rows[0].exercise_name, "Squat");
        assert_eq!(rows[0].sets, 4);
    }

    #[test]
    fn test_explicit_rows_are_ordered_by_position() {
        let inputs = vec![
            SessionExerciseInput {
                exercise_name: " Pull-up ".to_string(),
                sets: 3,
                reps: "AMRAP".to_string(),
                weight: None,
                notes: None,
                completed: Some(true),
            },
            SessionExerciseInput {
                exercise_name: "Row".to_string(),
                sets: 3,
                reps: "12".to_string(),
                weight: Some(40.0),
                notes: None,
                completed: None,
            },
        ];

        let rows = explicit_exercises(&inputs).unwrap();

        assert_eq!(rows[0].exercise_name, "Pull-up");
        assert!(rows[0].completed);
        assert_eq!(rows[1].sort_order, 1);
        assert!(!rows[1].completed);
        assert_eq!(rows[1].weight, Some(Decimal::from(40)));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), 20);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(1000)), 100);
    }
}
