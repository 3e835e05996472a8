//! Micronutrient catalogue service

use super::{delete_owned, require_owned};
use crate::error::ApiError;
use crate::repositories::{MicronutrientRecord, MicronutrientRepository};
use diet_tracker_shared::types::{
    CreateMicronutrientRequest, MicronutrientResponse, UpdateMicronutrientRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

const DUPLICATE_NAME: &str = "A micronutrient with this name already exists";

pub struct MicronutrientService;

impl MicronutrientService {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateMicronutrientRequest,
    ) -> Result<MicronutrientResponse, ApiError> {
        let record = MicronutrientRepository::create(db, user_id, req.name.trim(), req.unit.trim())
            .await
            .map_err(|e| ApiError::conflict_or_internal(e, DUPLICATE_NAME))?;

        Ok(to_response(record))
    }

    pub async fn list(db: &PgPool, user_id: Uuid) -> Result<Vec<MicronutrientResponse>, ApiError> {
        let records = MicronutrientRepository::list(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(to_response).collect())
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<MicronutrientResponse, ApiError> {
        let record = require_owned::<MicronutrientRecord>(db, id, user_id).await?;
        Ok(to_response(record))
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateMicronutrientRequest,
    ) -> Result<MicronutrientResponse, ApiError> {
        let record = MicronutrientRepository::update(
            db,
            id,
            user_id,
            req.name.as_deref().map(str::trim),
            req.unit.as_deref().map(str::trim),
        )
        .await
        .map_err(|e| ApiError::conflict_or_internal(e, DUPLICATE_NAME))?
        .ok_or_else(|| ApiError::NotFound("Micronutrient not found".to_string()))?;

        Ok(to_response(record))
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<MicronutrientRecord>(db, id, user_id).await
    }
}

fn to_response(record: MicronutrientRecord) -> MicronutrientResponse {
    MicronutrientResponse {
        id: record.id,
        name: record.name,
        unit: record.unit,
        created_at: record.created_at,
    }
}
