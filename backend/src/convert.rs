//! Conversions between database decimals and JSON floats
//!
//! Request floats are stored in `NUMERIC` columns. They are rounded here to
//! the column scale, so the value echoed back is the value that was stored.

use crate::error::ApiError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Scale of the `NUMERIC(_, 2)` quantity, nutrient and measurement columns
pub const VALUE_SCALE: u32 = 2;

/// Scale of `food_micronutrients.amount`
pub const AMOUNT_SCALE: u32 = 4;

/// Helper to convert Decimal to f64
pub fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Convert a request float to a decimal rounded half away from zero to `scale` places
pub fn f64_to_dec_scaled(f: f64, scale: u32) -> Result<Decimal, ApiError> {
    Decimal::try_from(f)
        .map(|d| d.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
        .map_err(|_| ApiError::BadRequest(format!("Numeric value {f} is out of range")))
}

/// Helper to convert f64 to Decimal at the default column scale
pub fn f64_to_dec(f: f64) -> Result<Decimal, ApiError> {
    f64_to_dec_scaled(f, VALUE_SCALE)
}

pub fn opt_dec_to_f64(d: Option<Decimal>) -> Option<f64> {
    d.map(dec_to_f64)
}

pub fn opt_f64_to_dec(f: Option<f64>) -> Result<Option<Decimal>, ApiError> {
    f.map(f64_to_dec).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_of_short_decimals() {
        assert_eq!(f64_to_dec(2.5).unwrap(), Decimal::new(25, 1));
        assert_eq!(dec_to_f64(Decimal::new(2475, 1)), 247.5);
    }

    #[test]
    fn test_rounds_to_column_scale() {
        assert_eq!(f64_to_dec(0.125).unwrap(), Decimal::new(13, 2));
        assert_eq!(f64_to_dec(99.994).unwrap(), Decimal::new(9999, 2));
        assert_eq!(f64_to_dec_scaled(0.12345, AMOUNT_SCALE).unwrap(), Decimal::new(1235, 4));
    }

    #[test]
    fn test_unrepresentable_floats_are_rejected() {
        for value in [1e30, f64::NAN, f64::INFINITY] {
            let err = f64_to_dec(value).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{value} was accepted");
        }
    }

    #[test]
    fn test_optional_values() {
        assert_eq!(opt_f64_to_dec(None).unwrap(), None);
        assert_eq!(opt_f64_to_dec(Some(1.5)).unwrap(), Some(Decimal::new(15, 1)));
        assert!(opt_f64_to_dec(Some(f64::NAN)).is_err());
        assert_eq!(opt_dec_to_f64(Some(Decimal::new(5, 1))), Some(0.5));
    }
}
