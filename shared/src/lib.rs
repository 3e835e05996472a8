//! Diet Tracker Shared Library
//!
//! Request/response types, domain enums and validators shared by the
//! backend and any API client.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{weekday_name, ImageFormat, MeasurementField};
pub use types::*;
