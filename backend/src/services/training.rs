//! Training program service

use super::session::SessionService;
use super::{delete_owned, require_all_owned, require_owned};
use crate::convert::{opt_dec_to_f64, opt_f64_to_dec};
use crate::error::ApiError;
use crate::repositories::{
    ExerciseRecord, NewTrainingExercise, TrainingExerciseChanges, TrainingExerciseRecord,
    TrainingFields, TrainingRecord, TrainingRepository,
};
use diet_tracker_shared::types::{
    CreateTrainingRequest, TrainingDetailResponse, TrainingExerciseInput,
    TrainingExerciseResponse, TrainingResponse, UpdateTrainingExerciseRequest,
    UpdateTrainingRequest,
};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Sessions shown with a single training
const RECENT_SESSIONS: i64 = 10;

pub struct TrainingService;

impl TrainingService {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateTrainingRequest,
    ) -> Result<TrainingResponse, ApiError> {
        let exercise_ids: Vec<Uuid> = req.exercises.iter().map(|e| e.exercise_id).collect();
        require_all_owned::<ExerciseRecord>(db, &exercise_ids, user_id).await?;

        let fields = TrainingFields {
            name: Some(req.name.trim().to_string()),
            description: req.description.clone(),
            training_type: req.training_type.clone(),
            is_active: req.is_active,
            day_of_week: req.day_of_week,
            duration: req.duration,
        };
        let lines = req
            .exercises
            .iter()
            .map(new_line)
            .collect::<Result<Vec<_>, _>>()?;

        let record = TrainingRepository::create(db, user_id, &fields, &lines)
            .await
            .map_err(ApiError::Internal)?;

        Self::single(db, record).await
    }

    /// List trainings, newest first, with their plan and session count
    pub async fn list(db: &PgPool, user_id: Uuid) -> Result<Vec<TrainingResponse>, ApiError> {
        let records = TrainingRepository::list(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Self::assemble(db, records).await
    }

    /// A training with its most recent sessions
    pub async fn get(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<TrainingDetailResponse, ApiError> {
        let record = require_owned::<TrainingRecord>(db, id, user_id).await?;
        let training = Self::single(db, record).await?;
        let recent_sessions =
            SessionService::recent_for_training(db, user_id, training.id, RECENT_SESSIONS).await?;

        Ok(TrainingDetailResponse {
            training,
            recent_sessions,
        })
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateTrainingRequest,
    ) -> Result<TrainingResponse, ApiError> {
        let changes = TrainingFields {
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            description: req.description.clone(),
            training_type: req.training_type.clone(),
            is_active: req.is_active,
            day_of_week: req.day_of_week,
            duration: req.duration,
        };

        let record = TrainingRepository::update(db, id, user_id, &changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Training not found".to_string()))?;

        Self::single(db, record).await
    }

    /// Delete a training; logged sessions keep their copy of the plan
    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<TrainingRecord>(db, id, user_id).await
    }

    /// Append an exercise to the plan; without an order it goes last
    pub async fn add_exercise(
        db: &PgPool,
        user_id: Uuid,
        training_id: Uuid,
        req: &TrainingExerciseInput,
    ) -> Result<TrainingExerciseResponse, ApiError> {
        require_owned::<TrainingRecord>(db, training_id, user_id).await?;
        require_owned::<ExerciseRecord>(db, req.exercise_id, user_id).await?;

        let record = TrainingRepository::add_exercise(db, training_id, &new_line(req)?)
            .await
            .map_err(ApiError::Internal)?;

        Ok(line_response(record))
    }

    pub async fn update_exercise(
        db: &PgPool,
        user_id: Uuid,
        training_id: Uuid,
        line_id: Uuid,
        req: &UpdateTrainingExerciseRequest,
    ) -> Result<TrainingExerciseResponse, ApiError> {
        require_owned::<TrainingRecord>(db, training_id, user_id).await?;

        let changes = TrainingExerciseChanges {
            sets: req.sets,
            reps: req.reps.clone(),
            rest_seconds: req.rest_seconds,
            weight: opt_f64_to_dec(req.weight)?,
            notes: req.notes.clone(),
            sort_order: req.order,
        };

        let record = TrainingRepository::update_exercise(db, training_id, line_id, &changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Training exercise not found".to_string()))?;

        Ok(line_response(record))
    }

    pub async fn remove_exercise(
        db: &PgPool,
        user_id: Uuid,
        training_id: Uuid,
        line_id: Uuid,
    ) -> Result<(), ApiError> {
        require_owned::<TrainingRecord>(db, training_id, user_id).await?;

        let removed = TrainingRepository::remove_exercise(db, training_id, line_id)
            .await
            .map_err(ApiError::Internal)?;

        if !removed {
            return Err(ApiError::NotFound("Training exercise not found".to_string()));
        }

        Ok(())
    }

    async fn single(db: &PgPool, record: TrainingRecord) -> Result<TrainingResponse, ApiError> {
        Self::assemble(db, vec![record])
            .await?
            .pop()
            .ok_or_else(|| ApiError::NotFound("Training not found".to_string()))
    }

    async fn assemble(
        db: &PgPool,
        records: Vec<TrainingRecord>,
    ) -> Result<Vec<TrainingResponse>, ApiError> {
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

        let lines = TrainingRepository::exercises_for(db, &ids)
            .await
            .map_err(ApiError::Internal)?;
        let counts: HashMap<Uuid, i64> = TrainingRepository::session_counts(db, &ids)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|c| (c.training_id, c.session_count))
            .collect();

        let mut by_training: HashMap<Uuid, Vec<TrainingExerciseResponse>> = HashMap::new();
        for line in lines {
            by_training
                .entry(line.training_id)
                .or_default()
                .push(line_response(line));
        }

        Ok(records
            .into_iter()
            .map(|record| TrainingResponse {
                exercises: by_training.remove(&record.id).unwrap_or_default(),
                session_count: counts.get(&record.id).copied().unwrap_or(0),
                id: record.id,
                name: record.name,
                description: record.description,
                training_type: record.training_type,
                is_active: record.is_active,
                day_of_week: record.day_of_week,
                duration: record.duration,
                created_at: record.created_at,
                updated_at: record.updated_at,
            })
            .collect())
    }
}

fn new_line(input: &TrainingExerciseInput) -> Result<NewTrainingExercise, ApiError> {
    Ok(NewTrainingExercise {
        exercise_id: input.exercise_id,
        sets: input.sets,
        reps: input.reps.trim().to_string(),
        rest_seconds: input.rest_seconds,
        weight: opt_f64_to_dec(input.weight)?,
        notes: input.notes.clone(),
        sort_order: input.order,
    })
}

fn line_response(record: TrainingExerciseRecord) -> TrainingExerciseResponse {
    TrainingExerciseResponse {
        id: record.id,
        exercise_id: record.exercise_id,
        exercise_name: record.exercise_name,
        muscle_group: record.muscle_group,
        sets: record.sets,
        reps: record.reps,
        rest_seconds: record.rest_seconds,
        weight: opt_dec_to_f64(record.weight),
        notes: record.notes,
        order: record.sort_order,
    }
}
