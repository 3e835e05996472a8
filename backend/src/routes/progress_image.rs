//! Progress photo routes, including the multipart upload

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::services::{ImageUpload, ProgressImageService};
use crate::state::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use diet_tracker_shared::types::{
    ProgressImageQuery, ProgressImageResponse, TimelineEntry, UpdateProgressImageRequest,
};

const MAX_CATEGORY_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Create progress image routes
///
/// `upload_limit` bounds the whole multipart body of `POST /`.
pub fn progress_image_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_images)
                .post(upload_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/categories", get(get_categories))
        .route("/timeline", get(get_timeline))
        .route(
            "/:id",
            get(get_image).patch(update_image).delete(delete_image),
        )
}

/// POST /api/v1/progress-images - multipart form with `file`, `date`, `category`, `description`
async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<ProgressImageResponse>)> {
    let multipart = multipart.map_err(|rejection| {
        ApiError::BadRequest(format!("Invalid multipart body: {}", rejection.body_text()))
    })?;

    let upload = read_upload(multipart).await?;
    let image = ProgressImageService::upload(state.db(), state.storage(), auth.user_id, upload)
        .await?;

    Ok((StatusCode::CREATED, Json(image)))
}

/// GET /api/v1/progress-images?category= - Newest first
async fn list_images(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ProgressImageQuery>,
) -> ApiResult<Json<Vec<ProgressImageResponse>>> {
    let images =
        ProgressImageService::list(state.db(), auth.user_id, query.category.as_deref()).await?;
    Ok(Json(images))
}

/// GET /api/v1/progress-images/categories
async fn get_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<String>>> {
    let categories = ProgressImageService::categories(state.db(), auth.user_id).await?;
    Ok(Json(categories))
}

/// GET /api/v1/progress-images/timeline - Grouped by month, oldest first
async fn get_timeline(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TimelineEntry>>> {
    let timeline = ProgressImageService::timeline(state.db(), auth.user_id).await?;
    Ok(Json(timeline))
}

/// GET /api/v1/progress-images/:id
async fn get_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ProgressImageResponse>> {
    let id = parse_id(&id, "progress image")?;
    let image = ProgressImageService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(image))
}

/// PATCH /api/v1/progress-images/:id - Metadata only, the file is immutable
async fn update_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProgressImageRequest>,
) -> ApiResult<Json<ProgressImageResponse>> {
    let id = parse_id(&id, "progress image")?;
    let image = ProgressImageService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(image))
}

/// DELETE /api/v1/progress-images/:id
async fn delete_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<()>> {
    let id = parse_id(&id, "progress image")?;
    ProgressImageService::delete(state.db(), state.storage(), auth.user_id, id).await?;
    Ok(Json(()))
}

/// Collect the form fields; unknown fields are skipped
async fn read_upload(mut multipart: Multipart) -> ApiResult<ImageUpload> {
    let mut upload = ImageUpload::default();
    let mut has_file = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                upload.content_type = field.content_type().map(str::to_string);
                upload.file_name = field.file_name().map(str::to_string);
                upload.bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
                has_file = true;
            }
            "date" => {
                let raw = field.text().await.map_err(multipart_error)?;
                upload.date = parse_form_date(&raw)?;
            }
            "category" => {
                let raw = field.text().await.map_err(multipart_error)?;
                upload.category = Some(bounded_text("category", raw, MAX_CATEGORY_LEN)?);
            }
            "description" => {
                let raw = field.text().await.map_err(multipart_error)?;
                upload.description = Some(bounded_text("description", raw, MAX_DESCRIPTION_LEN)?);
            }
            _ => {}
        }
    }

    if !has_file {
        return Err(ApiError::Validation("File is required".to_string()));
    }

    Ok(upload)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Upload exceeds the size limit".to_string())
    } else {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Accept an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC)
fn parse_form_date(raw: &str) -> ApiResult<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| ApiError::InvalidField {
            field: "date".to_string(),
            message: "Invalid date, expected YYYY-MM-DD or an RFC 3339 timestamp".to_string(),
        })
}

fn bounded_text(field: &str, raw: String, max: usize) -> ApiResult<String> {
    if raw.chars().count() > max {
        return Err(ApiError::InvalidField {
            field: field.to_string(),
            message: format!("Must be at most {max} characters"),
        });
    }
    Ok(raw)
}
