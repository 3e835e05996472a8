//! Body measurement service
//!
//! Provides measurement logging plus:
//! - change between the oldest and latest entry
//! - per-field progress series for charts

use super::{delete_owned, require_owned};
use crate::convert::{dec_to_f64, opt_dec_to_f64, opt_f64_to_dec};
use crate::error::ApiError;
use crate::repositories::{MeasurementRecord, MeasurementRepository, MeasurementValues};
use diet_tracker_shared::types::{
    MeasurementChanges, MeasurementRequest, MeasurementResponse, MeasurementStatsResponse,
    ProgressPoint,
};
use diet_tracker_shared::MeasurementField;
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

/// Points returned by the progress endpoint when no limit is given
pub const DEFAULT_PROGRESS_LIMIT: i64 = 30;
const MAX_LIMIT: i64 = 1000;

pub struct MeasurementService;

impl MeasurementService {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &MeasurementRequest,
    ) -> Result<MeasurementResponse, ApiError> {
        let record = MeasurementRepository::create(db, user_id, &values_from_request(req)?)
            .await
            .map_err(ApiError::Internal)?;

        Ok(to_response(record))
    }

    /// Measurements newest first
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<MeasurementResponse>, ApiError> {
        let limit = limit.map(|l| l.clamp(1, MAX_LIMIT));
        let records = MeasurementRepository::list(db, user_id, limit)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(to_response).collect())
    }

    pub async fn latest(db: &PgPool, user_id: Uuid) -> Result<Option<MeasurementResponse>, ApiError> {
        let record = MeasurementRepository::latest(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(record.map(to_response))
    }

    /// Oldest and latest measurement with the change between them; `None` without data
    pub async fn stats(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<MeasurementStatsResponse>, ApiError> {
        let latest = MeasurementRepository::latest(db, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let oldest = MeasurementRepository::oldest(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(match (latest, oldest) {
            (Some(latest), Some(oldest)) => Some(stats_between(latest, oldest)),
            _ => None,
        })
    }

    /// The most recent values of one field, oldest first
    pub async fn progress(
        db: &PgPool,
        user_id: Uuid,
        field: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ProgressPoint>, ApiError> {
        let field: MeasurementField = field.parse().map_err(|e: diet_tracker_shared::ModelError| {
            ApiError::InvalidField {
                field: "field".to_string(),
                message: e.to_string(),
            }
        })?;
        let limit = limit.unwrap_or(DEFAULT_PROGRESS_LIMIT).clamp(1, MAX_LIMIT);

        let records = MeasurementRepository::progress(db, user_id, field, limit)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records
            .into_iter()
            .map(|r| ProgressPoint {
                date: r.date,
                value: dec_to_f64(r.value),
            })
            .collect())
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<MeasurementResponse, ApiError> {
        let record = require_owned::<MeasurementRecord>(db, id, user_id).await?;
        Ok(to_response(record))
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &MeasurementRequest,
    ) -> Result<MeasurementResponse, ApiError> {
        let record = MeasurementRepository::update(db, id, user_id, &values_from_request(req)?)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Body measurement not found".to_string()))?;

        Ok(to_response(record))
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        delete_owned::<MeasurementRecord>(db, id, user_id).await
    }
}

/// Stats over two measurements; a change is only reported when both ends have the value
pub fn stats_between(latest: MeasurementRecord, oldest: MeasurementRecord) -> MeasurementStatsResponse {
    let changes = MeasurementChanges {
        weight: change(latest.weight, oldest.weight),
        body_fat: change(latest.body_fat, oldest.body_fat),
        muscle_mass: change(latest.muscle_mass, oldest.muscle_mass),
    };
    let period_days = (latest.date - oldest.date).num_days();

    MeasurementStatsResponse {
        latest: to_response(latest),
        oldest: to_response(oldest),
        changes,
        period_days,
    }
}

fn change(latest: Option<Decimal>, oldest: Option<Decimal>) -> Option<f64> {
    match (latest, oldest) {
        (Some(latest), Some(oldest)) => Some(dec_to_f64(
            (latest - oldest).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )),
        _ => None,
    }
}

fn values_from_request(req: &MeasurementRequest) -> Result<MeasurementValues, ApiError> {
    Ok(MeasurementValues {
        date: req.date,
        weight: opt_f64_to_dec(req.weight)?,
        height: opt_f64_to_dec(req.height)?,
        body_fat: opt_f64_to_dec(req.body_fat)?,
        muscle_mass: opt_f64_to_dec(req.muscle_mass)?,
        chest: opt_f64_to_dec(req.chest)?,
        waist: opt_f64_to_dec(req.waist)?,
        hips: opt_f64_to_dec(req.hips)?,
        left_arm: opt_f64_to_dec(req.left_arm)?,
        right_arm: opt_f64_to_dec(req.right_arm)?,
        left_thigh: opt_f64_to_dec(req.left_thigh)?,
        right_thigh: opt_f64_to_dec(req.right_thigh)?,
        left_calf: opt_f64_to_dec(req.left_calf)?,
        right_calf: opt_f64_to_dec(req.right_calf)?,
        shoulders: opt_f64_to_dec(req.shoulders)?,
        neck: opt_f64_to_dec(req.neck)?,
        notes: req.notes.clone(),
    })
}

pub(crate) fn to_response(record: MeasurementRecord) -> MeasurementResponse {
    MeasurementResponse {
        id: record.id,
        date: record.date,
        weight: opt_dec_to_f64(record.weight),
        height: opt_dec_to_f64(record.height),
        body_fat: opt_dec_to_f64(record.body_fat),
        muscle_mass: opt_dec_to_f64(record.muscle_mass),
        chest: opt_dec_to_f64(record.chest),
        waist: opt_dec_to_f64(record.waist),
        hips: opt_dec_to_f64(record.hips),
        left_arm: opt_dec_to_f64(record.left_arm),
        right_arm: opt_dec_to_f64(record.right_arm),
        left_thigh: opt_dec_to_f64(record.left_thigh),
        right_thigh: opt_dec_to_f64(record.right_thigh),
        left_calf: opt_dec_to_f64(record.left_calf),
        right_calf: opt_dec_to_f64(record.right_calf),
        shoulders: opt_dec_to_f64(record.shoulders),
        neck: opt_dec_to_f64(record.neck),
        notes: record.notes,
        created_at: record.created_at,
    }
}
