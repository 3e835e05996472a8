//! Progress image repository

use super::owned::OwnedRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const IMAGE_COLUMNS: &str = "id, user_id, image_url, date, category, description, created_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressImageRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OwnedRecord for ProgressImageRecord {
    const TABLE: &'static str = "progress_images";
    const COLUMNS: &'static str = IMAGE_COLUMNS;
    const LABEL: &'static str = "Progress image";
}

/// Image metadata; on update `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ImageMetadata {
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub description: Option<String>,
}

pub struct ProgressImageRepository;

impl ProgressImageRepository {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        image_url: &str,
        metadata: &ImageMetadata,
    ) -> Result<ProgressImageRecord> {
        let sql = format!(
            r#"
            INSERT INTO progress_images (user_id, image_url, date, category, description)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
            RETURNING {IMAGE_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, ProgressImageRecord>(&sql)
            .bind(user_id)
            .bind(image_url)
            .bind(metadata.date)
            .bind(metadata.category.as_deref())
            .bind(metadata.description.as_deref())
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    /// Images newest first, optionally in one category
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        category: Option<&str>,
    ) -> Result<Vec<ProgressImageRecord>> {
        let sql = format!(
            r#"
            SELECT {IMAGE_COLUMNS}
            FROM progress_images
            WHERE user_id = $1
              AND ($2::text IS NULL OR category = $2)
            ORDER BY date DESC, id ASC
            "#
        );

        let records = sqlx::query_as::<_, ProgressImageRecord>(&sql)
            .bind(user_id)
            .bind(category)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// All images oldest first, for grouping into a timeline
    pub async fn list_chronological(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProgressImageRecord>> {
        let sql = format!(
            r#"
            SELECT {IMAGE_COLUMNS}
            FROM progress_images
            WHERE user_id = $1
            ORDER BY date ASC, id ASC
            "#
        );

        let records = sqlx::query_as::<_, ProgressImageRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Distinct categories in use, sorted
    pub async fn categories(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM progress_images
            WHERE user_id = $1 AND category IS NOT NULL
            ORDER BY category ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &ImageMetadata,
    ) -> Result<Option<ProgressImageRecord>> {
        let sql = format!(
            r#"
            UPDATE progress_images SET
                date = COALESCE($3, date),
                category = COALESCE($4, category),
                description = COALESCE($5, description)
            WHERE id = $1 AND user_id = $2
            RETURNING {IMAGE_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, ProgressImageRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.date)
            .bind(changes.category.as_deref())
            .bind(changes.description.as_deref())
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Stored URLs of every image a user owns
    pub async fn urls_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>> {
        let urls = sqlx::query_scalar::<_, String>(
            "SELECT image_url FROM progress_images WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(urls)
    }
}
