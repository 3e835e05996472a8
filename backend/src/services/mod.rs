//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems. They return API types so handlers
//! stay thin.

pub mod diet;
pub mod exercise;
pub mod food;
pub mod meal;
pub mod measurement;
pub mod micronutrient;
pub mod nutrition;
pub mod pdf;
pub mod progress_image;
pub mod report;
pub mod session;
pub mod storage;
pub mod training;
pub mod user;

pub use diet::DietService;
pub use exercise::ExerciseService;
pub use food::FoodService;
pub use meal::MealService;
pub use measurement::MeasurementService;
pub use micronutrient::MicronutrientService;
pub use nutrition::NutritionService;
pub use pdf::{ChromiumRenderer, PdfRenderer};
pub use progress_image::{ImageUpload, ProgressImageService};
pub use report::{PdfReport, ReportService};
pub use session::SessionService;
pub use storage::ImageStorage;
pub use training::TrainingService;
pub use user::UserService;

use crate::error::ApiError;
use crate::repositories::{OwnedRecord, OwnedRepository};
use sqlx::PgPool;
use uuid::Uuid;

fn not_found<R: OwnedRecord>() -> ApiError {
    ApiError::NotFound(format!("{} not found", R::LABEL))
}

/// Load a row owned by the user; a row owned by someone else is reported as missing
pub(crate) async fn require_owned<R: OwnedRecord>(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<R, ApiError> {
    OwnedRepository::find::<R>(db, id, user_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(not_found::<R>)
}

/// Fail with NotFound unless every referenced row is owned by the user
pub(crate) async fn require_all_owned<R: OwnedRecord>(
    db: &PgPool,
    ids: &[Uuid],
    user_id: Uuid,
) -> Result<(), ApiError> {
    let owned = OwnedRepository::all_owned::<R>(db, ids, user_id)
        .await
        .map_err(ApiError::Internal)?;

    if owned {
        Ok(())
    } else {
        Err(not_found::<R>())
    }
}

/// Delete a row owned by the user
pub(crate) async fn delete_owned<R: OwnedRecord>(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let deleted = OwnedRepository::delete::<R>(db, id, user_id)
        .await
        .map_err(ApiError::Internal)?;

    if deleted {
        Ok(())
    } else {
        Err(not_found::<R>())
    }
}

/// Reject a list that names the same ID twice
pub(crate) fn ensure_distinct(ids: &[Uuid], message: &str) -> Result<(), ApiError> {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}
