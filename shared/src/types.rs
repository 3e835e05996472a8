//! API request and response types
//!
//! Request types carry their validation rules as `validator` attributes; the
//! backend rejects a body that fails them before any service code runs.

use crate::validation::{
    validate_date_range, validate_not_blank, validate_reps, validate_time_of_day,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Optional result cap for list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// Auth & users
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login response: tokens plus the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: AuthTokens,
    pub user: UserProfile,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request (administrators only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// User profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update of the current user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

// ============================================================================
// Micronutrients
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMicronutrientRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMicronutrientRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicronutrientResponse {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Foods
// ============================================================================
//
// Numeric bounds follow the storage columns: quantities, nutrients, targets and
// weights are NUMERIC(10, 2), body measurements NUMERIC(6, 2) and micronutrient
// amounts NUMERIC(12, 4). Extra decimal places are rounded half away from zero
// to the column scale when stored.

/// Amount of a micronutrient per serving of a food
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodMicronutrientInput {
    pub micronutrient_id: Uuid,
    #[validate(range(min = 0.0, max = 99999999.9999))]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFoodRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub serving_size: f64,
    #[validate(length(min = 1, max = 20))]
    pub serving_unit: Option<String>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub calories: f64,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub proteins: f64,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub carbohydrates: f64,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub fats: f64,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub fiber: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub sodium: Option<f64>,
    #[serde(default)]
    #[validate(nested)]
    pub micronutrients: Vec<FoodMicronutrientInput>,
}

/// Partial food update; a present `micronutrients` list replaces the existing one
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFoodRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub serving_size: Option<f64>,
    #[validate(length(min = 1, max = 20))]
    pub serving_unit: Option<String>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub calories: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub proteins: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub carbohydrates: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub fats: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub fiber: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub sodium: Option<f64>,
    #[validate(nested)]
    pub micronutrients: Option<Vec<FoodMicronutrientInput>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodSearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodMicronutrientResponse {
    pub micronutrient_id: Uuid,
    pub name: String,
    pub unit: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodResponse {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: f64,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: Option<f64>,
    pub sodium: Option<f64>,
    pub micronutrients: Vec<FoodMicronutrientResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Nutrition totals
// ============================================================================

/// Summed amount of one micronutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicronutrientTotal {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Macro and micronutrient totals, rounded to one decimal place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
    pub sodium: f64,
    pub micronutrients: Vec<MicronutrientTotal>,
}

/// Target macros of a diet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: Option<f64>,
    pub proteins: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fats: Option<f64>,
}

/// Actual minus target per macro; `None` where no target is set
pub type MacroDifference = MacroTargets;

// ============================================================================
// Meals
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MealFoodInput {
    pub food_id: Uuid,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMealRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_time_of_day"))]
    pub time: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub foods: Vec<MealFoodInput>,
}

/// Partial meal update; a present `foods` list replaces the existing one
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMealRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_time_of_day"))]
    pub time: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
    #[validate(nested)]
    pub foods: Option<Vec<MealFoodInput>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddFoodToMealRequest {
    pub food_id: Uuid,
    #[validate(range(min = 0.1, max = 99999999.99))]
    pub quantity: f64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMealFoodRequest {
    #[validate(range(min = 0.1, max = 99999999.99))]
    pub quantity: f64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealFoodResponse {
    pub id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub brand: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub quantity: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub time: Option<String>,
    pub order: i32,
    pub foods: Vec<MealFoodResponse>,
    pub totals: NutritionTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealNutritionResponse {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub totals: NutritionTotals,
}

// ============================================================================
// Diets
// ============================================================================

/// Meals scheduled for one weekday (0 = Sunday)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DietDayInput {
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: i16,
    #[serde(default)]
    pub meal_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_diet_dates"))]
pub struct CreateDietRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_calories: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_proteins: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_carbohydrates: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_fats: Option<f64>,
    /// Meals eaten every day
    #[serde(default)]
    pub meal_ids: Vec<Uuid>,
    #[serde(default)]
    #[validate(nested)]
    pub days: Vec<DietDayInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_diet_dates"))]
pub struct UpdateDietRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_calories: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_proteins: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_carbohydrates: Option<f64>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub target_fats: Option<f64>,
}

fn validate_create_diet_dates(req: &CreateDietRequest) -> Result<(), ValidationError> {
    validate_date_range(req.start_date, req.end_date)
}

fn validate_update_diet_dates(req: &UpdateDietRequest) -> Result<(), ValidationError> {
    validate_date_range(req.start_date, req.end_date)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMealToDietRequest {
    pub meal_id: Uuid,
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: Option<i16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DietNutritionQuery {
    #[validate(range(min = 0, max = 6))]
    pub day: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietMealResponse {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub meal_name: String,
    pub day_of_week: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub targets: MacroTargets,
    pub meals: Vec<DietMealResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietNutritionResponse {
    pub diet_id: Uuid,
    pub diet_name: String,
    pub description: Option<String>,
    pub day_of_week: Option<i16>,
    pub totals: NutritionTotals,
    pub targets: MacroTargets,
    pub difference: MacroDifference,
}

// ============================================================================
// Exercises
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExerciseRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub muscle_group: Option<String>,
    #[validate(length(max = 100))]
    pub equipment: Option<String>,
    #[validate(length(max = 5000))]
    pub instructions: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateExerciseRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub muscle_group: Option<String>,
    #[validate(length(max = 100))]
    pub equipment: Option<String>,
    #[validate(length(max = 5000))]
    pub instructions: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseQuery {
    pub muscle_group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Trainings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrainingExerciseInput {
    pub exercise_id: Uuid,
    #[validate(range(min = 1))]
    pub sets: i32,
    #[validate(length(max = 50), custom(function = "validate_reps"))]
    pub reps: String,
    #[validate(range(min = 0))]
    pub rest_seconds: Option<i32>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub weight: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTrainingRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub training_type: Option<String>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: Option<i16>,
    /// Planned duration in minutes
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<TrainingExerciseInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTrainingRequest {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub training_type: Option<String>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: Option<i16>,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTrainingExerciseRequest {
    #[validate(range(min = 1))]
    pub sets: Option<i32>,
    #[validate(length(max = 50), custom(function = "validate_reps"))]
    pub reps: Option<String>,
    #[validate(range(min = 0))]
    pub rest_seconds: Option<i32>,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub weight: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExerciseResponse {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub muscle_group: Option<String>,
    pub sets: i32,
    pub reps: String,
    pub rest_seconds: Option<i32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub training_type: Option<String>,
    pub is_active: bool,
    pub day_of_week: Option<i16>,
    pub duration: Option<i32>,
    pub exercises: Vec<TrainingExerciseResponse>,
    pub session_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Training with its most recent sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDetailResponse {
    #[serde(flatten)]
    pub training: TrainingResponse,
    pub recent_sessions: Vec<SessionResponse>,
}

// ============================================================================
// Training sessions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionExerciseInput {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub exercise_name: String,
    #[validate(range(min = 1))]
    pub sets: i32,
    #[validate(length(max = 50), custom(function = "validate_reps"))]
    pub reps: String,
    #[validate(range(min = 0.0, max = 99999999.99))]
    pub weight: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

/// Log a session; without `exercises` the training's current plan is copied
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub date: Option<DateTime<Utc>>,
    /// Actual duration in minutes
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub completed: Option<bool>,
    #[validate(nested)]
    pub exercises: Option<Vec<SessionExerciseInput>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSessionRequest {
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExerciseResponse {
    pub id: Uuid,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: String,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub completed: bool,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub training_id: Option<Uuid>,
    pub training_name: String,
    pub date: DateTime<Utc>,
    pub duration: Option<i32>,
    pub notes: Option<String>,
    pub completed: bool,
    pub exercises: Vec<SessionExerciseResponse>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Body measurements
// ============================================================================

/// Body measurement; every value is stored with two decimal places
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MeasurementRequest {
    pub date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub height: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub body_fat: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub muscle_mass: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub chest: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub waist: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub hips: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub left_arm: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub right_arm: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub left_thigh: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub right_thigh: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub left_calf: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub right_calf: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub shoulders: Option<f64>,
    #[validate(range(min = 0.0, max = 9999.99))]
    pub neck: Option<f64>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResponse {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub left_arm: Option<f64>,
    pub right_arm: Option<f64>,
    pub left_thigh: Option<f64>,
    pub right_thigh: Option<f64>,
    pub left_calf: Option<f64>,
    pub right_calf: Option<f64>,
    pub shoulders: Option<f64>,
    pub neck: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Change between the oldest and latest measurement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementChanges {
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementStatsResponse {
    pub latest: MeasurementResponse,
    pub oldest: MeasurementResponse,
    pub changes: MeasurementChanges,
    pub period_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

// ============================================================================
// Progress images
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProgressImageRequest {
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressImageQuery {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressImageResponse {
    pub id: Uuid,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Images taken in one calendar month (`YYYY-MM`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub month: String,
    pub images: Vec<ProgressImageResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_food_request_valid() {
        let req: CreateFoodRequest = serde_json::from_value(json!({
            "name": "Chicken breast",
            "serving_size": 100.0,
            "calories": 165.0,
            "proteins": 31.0,
            "carbohydrates": 0.0,
            "fats": 3.6,
            "micronutrients": [
                { "micronutrient_id": Uuid::new_v4(), "amount": 0.9 }
            ]
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.serving_unit, None);
    }

    #[test]
    fn test_create_food_rejects_negative_macros() {
        let req: CreateFoodRequest = serde_json::from_value(json!({
            "name": "Broken",
            "serving_size": 100.0,
            "calories": -1.0,
            "proteins": 0.0,
            "carbohydrates": 0.0,
            "fats": 0.0
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("calories"));
    }

    #[test]
    fn test_create_food_rejects_values_beyond_storage() {
        let req: CreateFoodRequest = serde_json::from_value(json!({
            "name": "Broken",
            "serving_size": 100.0,
            "calories": 1e30,
            "proteins": 1e9,
            "carbohydrates": 99999999.99,
            "fats": 0.0
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("calories"));
        assert!(fields.contains_key("proteins"));
        assert!(!fields.contains_key("carbohydrates"));
    }

    #[test]
    fn test_measurement_bounds_follow_columns() {
        let within = MeasurementRequest {
            weight: Some(9999.99),
            body_fat: Some(100.0),
            ..Default::default()
        };
        assert!(within.validate().is_ok());

        let beyond = MeasurementRequest {
            weight: Some(12000.0),
            body_fat: Some(100.5),
            ..Default::default()
        };
        let errors = beyond.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("weight"));
        assert!(errors.field_errors().contains_key("body_fat"));
    }

    #[test]
    fn test_nested_micronutrient_amount_validated() {
        let req: CreateFoodRequest = serde_json::from_value(json!({
            "name": "Spinach",
            "serving_size": 100.0,
            "calories": 23.0,
            "proteins": 2.9,
            "carbohydrates": 3.6,
            "fats": 0.4,
            "micronutrients": [
                { "micronutrient_id": Uuid::new_v4(), "amount": -2.7 }
            ]
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let req = CreateMicronutrientRequest {
            name: "   ".to_string(),
            unit: "mg".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_meal_time_validated() {
        let mut req = CreateMealRequest {
            name: "Breakfast".to_string(),
            description: None,
            time: Some("07:30".to_string()),
            order: Some(0),
            foods: vec![],
        };
        assert!(req.validate().is_ok());

        req.time = Some("7h30".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_add_food_to_meal_minimum_quantity() {
        let req = AddFoodToMealRequest {
            food_id: Uuid::new_v4(),
            quantity: 0.05,
            notes: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_diet_day_of_week_bounds() {
        let req = AddMealToDietRequest {
            meal_id: Uuid::new_v4(),
            day_of_week: Some(7),
        };
        assert!(req.validate().is_err());

        let req = AddMealToDietRequest {
            meal_id: Uuid::new_v4(),
            day_of_week: Some(6),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_diet_date_range_checked_at_struct_level() {
        let req: CreateDietRequest = serde_json::from_value(json!({
            "name": "Cut",
            "start_date": "2024-03-01",
            "end_date": "2024-02-01"
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_training_exercise_requires_a_set() {
        let req: CreateTrainingRequest = serde_json::from_value(json!({
            "name": "Push day",
            "exercises": [
                { "exercise_id": Uuid::new_v4(), "sets": 0, "reps": "10" }
            ]
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rules() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            name: "Al".to_string(),
            password: "secret".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            email: "al@example.com".to_string(),
            name: "A".to_string(),
            password: "secret".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            email: "al@example.com".to_string(),
            name: "Al".to_string(),
            password: "secret".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_login_response_flattens_tokens() {
        let response = LoginResponse {
            tokens: AuthTokens {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
            },
            user: UserProfile {
                id: Uuid::new_v4(),
                email: "al@example.com".to_string(),
                name: "Al".to_string(),
                is_admin: false,
                avatar_url: None,
                created_at: Utc::now(),
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["access_token"], "a");
        assert_eq!(value["user"]["email"], "al@example.com");
    }
}
