//! Progress photo service

use super::storage::ImageStorage;
use super::{delete_owned, require_owned};
use crate::error::ApiError;
use crate::repositories::{ImageMetadata, ProgressImageRecord, ProgressImageRepository};
use chrono::{DateTime, Utc};
use diet_tracker_shared::types::{
    ProgressImageResponse, TimelineEntry, UpdateProgressImageRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

/// A file received from a multipart upload, plus its form fields
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub description: Option<String>,
}

pub struct ProgressImageService;

impl ProgressImageService {
    /// Validate, store and record an uploaded image
    ///
    /// Nothing is written before validation passes. When the row insert
    /// fails the stored file is removed again.
    pub async fn upload(
        db: &PgPool,
        storage: &ImageStorage,
        user_id: Uuid,
        upload: ImageUpload,
    ) -> Result<ProgressImageResponse, ApiError> {
        let format = storage.validate(
            upload.content_type.as_deref(),
            upload.file_name.as_deref(),
            upload.bytes.len(),
        )?;

        let image_url = storage
            .store(format, &upload.bytes)
            .await
            .map_err(ApiError::Internal)?;

        let metadata = ImageMetadata {
            date: upload.date,
            category: non_blank(upload.category),
            description: upload.description,
        };

        match ProgressImageRepository::create(db, user_id, &image_url, &metadata).await {
            Ok(record) => {
                tracing::info!(image_id = %record.id, user_id = %user_id, "Progress image uploaded");
                Ok(to_response(record))
            }
            Err(e) => {
                storage.remove(&image_url).await;
                Err(ApiError::Internal(e))
            }
        }
    }

    /// Images newest first, optionally in one category
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        category: Option<&str>,
    ) -> Result<Vec<ProgressImageResponse>, ApiError> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        let records = ProgressImageRepository::list(db, user_id, category)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(to_response).collect())
    }

    pub async fn categories(db: &PgPool, user_id: Uuid) -> Result<Vec<String>, ApiError> {
        ProgressImageRepository::categories(db, user_id)
            .await
            .map_err(ApiError::Internal)
    }

    /// Images grouped by calendar month, oldest month first
    pub async fn timeline(db: &PgPool, user_id: Uuid) -> Result<Vec<TimelineEntry>, ApiError> {
        let records = ProgressImageRepository::list_chronological(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(group_by_month(records.into_iter().map(to_response).collect()))
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<ProgressImageResponse, ApiError> {
        let record = require_owned::<ProgressImageRecord>(db, id, user_id).await?;
        Ok(to_response(record))
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateProgressImageRequest,
    ) -> Result<ProgressImageResponse, ApiError> {
        let changes = ImageMetadata {
            date: req.date,
            category: non_blank(req.category.clone()),
            description: req.description.clone(),
        };

        let record = ProgressImageRepository::update(db, id, user_id, &changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Progress image not found".to_string()))?;

        Ok(to_response(record))
    }

    /// Delete the row, then the file behind it
    pub async fn delete(
        db: &PgPool,
        storage: &ImageStorage,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(), ApiError> {
        let record = require_owned::<ProgressImageRecord>(db, id, user_id).await?;
        delete_owned::<ProgressImageRecord>(db, id, user_id).await?;

        storage.remove(&record.image_url).await;
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Group images already sorted by date into `YYYY-MM` buckets
pub fn group_by_month(images: Vec<ProgressImageResponse>) -> Vec<TimelineEntry> {
    let mut timeline: Vec<TimelineEntry> = Vec::new();

    for image in images {
        let month = image.date.format("%Y-%m").to_string();
        match timeline.last_mut() {
            Some(entry) if entry.month == month => entry.images.push(image),
            _ => timeline.push(TimelineEntry {
                month,
                images: vec![image],
            }),
        }
    }

    timeline
}

fn to_response(record: ProgressImageRecord) -> ProgressImageResponse {
    ProgressImageResponse {
        id: record.id,
        image_url: record.image_url,
        date: record.date,
        category: record.category,
        description: record.description,
        created_at: record.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn image(year: i32, month: u32, day: u32) -> ProgressImageResponse {
        let date = Utc.with_ymd_and_hms(year, month, day, 8, 0, 0).unwrap();
        ProgressImageResponse {
            id: Uuid::new_v4(),
            image_url: format!("uploads/{}.jpg", Uuid::new_v4()),
            date,
            category: Some("front".to_string()),
            description: None,
            created_at: date,
        }
    }

    #[test]
    fn test_group_by_month() {
        let images = vec![
            image(2024, 1, 3),
            image(2024, 1, 28),
            image(2024, 3, 1),
            image(2025, 1, 15),
        ];

        let timeline = group_by_month(images);

        let months: Vec<&str> = timeline.iter().map(|e| e.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-03", "2025-01"]);
        assert_eq!(timeline[0].images.len(), 2);
        assert!(timeline[0].images[0].date < timeline[0].images[1].date);
    }

    #[test]
    fn test_group_by_month_empty() {
        assert!(group_by_month(vec![]).is_empty());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  side ".to_string())), Some("side".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
