//! Exercise library service

use super::{delete_owned, require_owned};
use crate::error::ApiError;
use crate::repositories::{ExerciseFields, ExerciseRecord, ExerciseRepository};
use diet_tracker_shared::types::{CreateExerciseRequest, ExerciseResponse, UpdateExerciseRequest};
use sqlx::PgPool;
use uuid::Uuid;

/// Exercise service
pub struct ExerciseService;

impl ExerciseService {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateExerciseRequest,
    ) -> Result<ExerciseResponse, ApiError> {
        let fields = ExerciseFields {
            name: None,
            description: req.description.clone(),
            muscle_group: req.muscle_group.clone(),
            equipment: req.equipment.clone(),
            instructions: req.instructions.clone(),
            video_url: req.video_url.clone(),
        };

        let record = ExerciseRepository::create(db, user_id, req.name.trim(), &fields)
            .await
            .map_err(ApiError::Internal)?;

        Ok(to_response(record))
    }

    /// List exercises ordered by name, optionally for one muscle group
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        muscle_group: Option<&str>,
    ) -> Result<Vec<ExerciseResponse>, ApiError> {
        let muscle_group = muscle_group.map(str::trim).filter(|g| !g.is_empty());

        let records = ExerciseRepository::list(db, user_id, muscle_group)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(to_response).collect())
    }

    pub async fn muscle_groups(db: &PgPool, user_id: Uuid) -> Result<Vec<String>, ApiError> {
        ExerciseRepository::muscle_groups(db, user_id)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<ExerciseResponse, ApiError> {
        let record = require_owned::<ExerciseRecord>(db, id, user_id).await?;
        Ok(to_response(record))
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateExerciseRequest,
    ) -> Result<ExerciseResponse, ApiError> {
        let changes = ExerciseFields {
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            description: req.description.clone(),
            muscle_group: req.muscle_group.clone(),
            equipment: req.equipment.clone(),
            instructions: req.instructions.clone(),
            video_url: req.video_url.clone(),
        };

        let record = ExerciseRepository::update(db, id, user_id, &changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

        Ok(to_response(record))
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<ExerciseRecord>(db, id, user_id).await
    }
}

fn to_response(record: ExerciseRecord) -> ExerciseResponse {
    ExerciseResponse {
        id: record.id,
        name: record.name,
        description: record.description,
        muscle_group: record.muscle_group,
        equipment: record.equipment,
        instructions: record.instructions,
        video_url: record.video_url,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}
