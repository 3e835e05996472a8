//! Route definitions for the Diet Tracker API
//!
//! This module organizes all API routes and applies middleware.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

mod auth;
mod diet;
mod exercise;
mod food;
mod health;
mod meal;
mod measurement;
mod micronutrient;
mod progress_image;
mod report;
mod training;
mod user;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod validation_tests;

pub use auth::auth_routes;
pub use diet::diet_routes;
pub use exercise::exercise_routes;
pub use food::food_routes;
pub use meal::meal_routes;
pub use measurement::measurement_routes;
pub use micronutrient::micronutrient_routes;
pub use progress_image::progress_image_routes;
pub use report::report_routes;
pub use training::training_routes;
pub use user::user_routes;

/// Room for multipart boundaries and form fields around an uploaded file
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.storage().max_file_size() + MULTIPART_OVERHEAD;
    let uploads = ServeDir::new(state.storage().dir());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes(upload_limit))
        .nest_service("/uploads", uploads)
        // Apply middleware layers
        .layer(RequestBodyLimitLayer::new(upload_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Diet Tracker API v1" }))
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/micronutrients", micronutrient_routes())
        .nest("/foods", food_routes())
        .nest("/meals", meal_routes())
        .nest("/diets", diet_routes())
        .nest("/exercises", exercise_routes())
        .nest("/trainings", training_routes())
        .nest("/body-measurements", measurement_routes())
        .nest("/progress-images", progress_image_routes(upload_limit))
        .nest("/pdf", report_routes())
}

/// Parse a path segment as an id
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("Invalid {what} ID")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "food").unwrap(), id);

        match parse_id("not-a-uuid", "food") {
            Err(ApiError::Validation(message)) => assert_eq!(message, "Invalid food ID"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
