//! Health check endpoints
//!
//! - /health: process is up
//! - /health/ready: database reachable and upload directory present
//! - /health/live: liveness probe, never touches dependencies

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::path::Path;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual dependency checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub storage: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn from_result(result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy".to_string(),
                message: None,
            },
            Err(e) => Self {
                status: "unhealthy".to_string(),
                message: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

fn plain(status: &str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    plain("healthy")
}

/// Readiness probe; 503 when a dependency is unavailable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = CheckStatus::from_result(db::health_check(state.db()).await);
    let storage = CheckStatus::from_result(upload_dir_check(state.storage().dir()).await);

    let is_ready = database.is_healthy() && storage.is_healthy();
    if !is_ready {
        tracing::warn!(
            database = %database.status,
            storage = %storage.status,
            "Readiness check failed"
        );
    }

    let response = HealthResponse {
        status: if is_ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { database, storage }),
    };

    if is_ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe
pub async fn liveness_check() -> Json<HealthResponse> {
    plain("alive")
}

async fn upload_dir_check(dir: &Path) -> anyhow::Result<()> {
    let metadata = tokio::fs::metadata(dir)
        .await
        .map_err(|e| anyhow::anyhow!("Upload directory {} unavailable: {}", dir.display(), e))?;

    if !metadata.is_dir() {
        anyhow::bail!("Upload path {} is not a directory", dir.display());
    }
    Ok(())
}
