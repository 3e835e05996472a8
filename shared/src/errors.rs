//! Error types for the Diet Tracker domain models

use thiserror::Error;

/// Errors raised while interpreting domain values supplied by clients
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown measurement field: {0}")]
    UnknownMeasurementField(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error("File extension does not match content type")]
    ImageExtensionMismatch,
}
