//! Validating request extractors
//!
//! `ValidatedJson` and `ValidatedQuery` deserialize like axum's `Json` and
//! `Query`, then run the type's `validator` rules. Any failure becomes a 400
//! naming the offending field before the handler runs.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Field name `validator` uses for struct-level (schema) errors
const SCHEMA_FIELD: &str = "__all__";

/// JSON body that passed its validation rules
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        value.validate().map_err(validation_error)?;

        Ok(ValidatedJson(value))
    }
}

/// Query string that passed its validation rules
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        value.validate().map_err(validation_error)?;

        Ok(ValidatedQuery(value))
    }
}

/// Report the first failing field, in path order, as an API error
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut failures = Vec::new();
    flatten(None, &errors, &mut failures);
    failures.sort_by(|a, b| a.0.cmp(&b.0));

    match failures.into_iter().next() {
        Some((field, message)) if field.ends_with(SCHEMA_FIELD) => ApiError::Validation(message),
        Some((field, message)) => ApiError::InvalidField { field, message },
        None => ApiError::Validation("Invalid request".to_string()),
    }
}

/// Collect `(path, message)` pairs, e.g. `foods[0].quantity`
fn flatten(prefix: Option<&str>, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| (path.clone(), describe(e))));
            }
            ValidationErrorsKind::Struct(inner) => flatten(Some(&path), inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(Some(&format!("{path}[{index}]")), inner, out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match &*error.code {
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "is out of range".to_string(),
        },
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "has an invalid length".to_string(),
        },
        "email" => "must be a valid email address".to_string(),
        "url" => "must be a valid URL".to_string(),
        code => format!("is invalid ({code})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diet_tracker_shared::types::{CreateFoodRequest, CreateMealRequest, RegisterRequest};
    use serde_json::json;

    fn field_of(error: ApiError) -> (String, String) {
        match error {
            ApiError::InvalidField { field, message } => (field, message),
            other => panic!("expected a field error, got {other:?}"),
        }
    }

    #[test]
    fn test_top_level_field() {
        let req = RegisterRequest {
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            password: "123".to_string(),
        };

        let (field, message) = field_of(validation_error(req.validate().unwrap_err()));

        assert_eq!(field, "password");
        assert_eq!(message, "length must be between 6 and 128");
    }

    #[test]
    fn test_nested_list_path() {
        let req: CreateFoodRequest = serde_json::from_value(json!({
            "name": "Spinach",
            "serving_size": 100.0,
            "calories": 23.0,
            "proteins": 2.9,
            "carbohydrates": 3.6,
            "fats": 0.4,
            "micronutrients": [
                { "micronutrient_id": uuid::Uuid::new_v4(), "amount": 2.7 },
                { "micronutrient_id": uuid::Uuid::new_v4(), "amount": -1.0 }
            ]
        }))
        .unwrap();

        let (field, message) = field_of(validation_error(req.validate().unwrap_err()));

        assert_eq!(field, "micronutrients[1].amount");
        assert!(message.starts_with("must be at least"));
    }

    #[test]
    fn test_custom_message_is_kept() {
        let req = CreateMealRequest {
            name: "Lunch".to_string(),
            description: None,
            time: Some("25:00".to_string()),
            order: None,
            foods: vec![],
        };

        let (field, message) = field_of(validation_error(req.validate().unwrap_err()));

        assert_eq!(field, "time");
        assert_eq!(message, "must be a time of day formatted as HH:MM");
    }

    #[test]
    fn test_first_field_in_path_order_is_reported() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            name: "A".to_string(),
            password: "123".to_string(),
        };

        let (field, _) = field_of(validation_error(req.validate().unwrap_err()));
        assert_eq!(field, "email");
    }
}
