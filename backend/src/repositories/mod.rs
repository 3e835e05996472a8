//! Database repositories
//!
//! Provides data access layer for database operations. Every per-user table
//! is read and deleted through [`OwnedRepository`] so the owner predicate is
//! never forgotten.

pub mod diet;
pub mod exercise;
pub mod food;
pub mod meal;
pub mod measurement;
pub mod micronutrient;
pub mod nutrition;
pub mod owned;
pub mod progress_image;
pub mod session;
pub mod training;
pub mod user;

pub use diet::{DietFields, DietMealRecord, DietRecord, DietRepository, NewDietMeal};
pub use exercise::{ExerciseFields, ExerciseRecord, ExerciseRepository};
pub use food::{
    FoodChanges, FoodMicronutrientRecord, FoodRecord, FoodRepository, NewFood,
    NewFoodMicronutrient,
};
pub use meal::{MealChanges, MealFoodRecord, MealRecord, MealRepository, NewMeal, NewMealFood};
pub use measurement::{MeasurementRecord, MeasurementRepository, MeasurementValues, ProgressRecord};
pub use micronutrient::{MicronutrientRecord, MicronutrientRepository};
pub use nutrition::{NutritionLineRecord, NutritionRepository};
pub use owned::{OwnedRecord, OwnedRepository};
pub use progress_image::{ImageMetadata, ProgressImageRecord, ProgressImageRepository};
pub use session::{
    NewSession, NewSessionExercise, SessionChanges, SessionExerciseRecord, SessionRecord,
    SessionRepository,
};
pub use training::{
    NewTrainingExercise, SessionCountRecord, TrainingExerciseChanges, TrainingExerciseRecord,
    TrainingFields, TrainingRecord, TrainingRepository,
};
pub use user::{UpdateUser, UserRecord, UserRepository};
