//! Nutrition aggregation
//!
//! Totals are always recomputed from the current food rows: each line
//! contributes `value * quantity / serving_size` (100 when the serving size is
//! zero). Sums are kept as exact decimals and rounded once, to one decimal
//! place with midpoints away from zero, when converted to a response.

use crate::convert::dec_to_f64;
use crate::error::ApiError;
use crate::repositories::{
    FoodMicronutrientRecord, FoodRepository, NutritionLineRecord, NutritionRepository,
};
use diet_tracker_shared::types::{
    MacroDifference, MacroTargets, MicronutrientTotal, NutritionTotals,
};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Divisor used when a food has no serving size
const DEFAULT_SERVING_SIZE: Decimal = Decimal::ONE_HUNDRED;

/// Unrounded totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTotals {
    pub calories: Decimal,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub fiber: Decimal,
    pub sodium: Decimal,
    /// Keyed by micronutrient name: (amount, unit)
    pub micronutrients: BTreeMap<String, (Decimal, String)>,
}

impl RawTotals {
    /// Add one food line, scaled by its quantity
    pub fn add_line(&mut self, line: &NutritionLineRecord, micronutrients: &[FoodMicronutrientRecord]) {
        let scale = |value: Decimal| scaled(value, line.quantity, line.serving_size);

        self.calories += scale(line.calories);
        self.proteins += scale(line.proteins);
        self.carbohydrates += scale(line.carbohydrates);
        self.fats += scale(line.fats);
        self.fiber += scale(line.fiber.unwrap_or_default());
        self.sodium += scale(line.sodium.unwrap_or_default());

        for micro in micronutrients {
            let entry = self
                .micronutrients
                .entry(micro.name.clone())
                .or_insert_with(|| (Decimal::ZERO, micro.unit.clone()));
            entry.0 += scale(micro.amount);
        }
    }

    /// Rounded response form; micronutrients sorted by name
    pub fn rounded(&self) -> NutritionTotals {
        NutritionTotals {
            calories: round1(self.calories),
            proteins: round1(self.proteins),
            carbohydrates: round1(self.carbohydrates),
            fats: round1(self.fats),
            fiber: round1(self.fiber),
            sodium: round1(self.sodium),
            micronutrients: self
                .micronutrients
                .iter()
                .map(|(name, (amount, unit))| MicronutrientTotal {
                    name: name.clone(),
                    amount: round1(*amount),
                    unit: unit.clone(),
                })
                .collect(),
        }
    }

    /// Actual minus target per macro; `None` where no target is set
    pub fn difference(&self, targets: &DecimalTargets) -> MacroDifference {
        let diff = |actual: Decimal, target: Option<Decimal>| target.map(|t| round1(actual - t));

        MacroDifference {
            calories: diff(self.calories, targets.calories),
            proteins: diff(self.proteins, targets.proteins),
            carbohydrates: diff(self.carbohydrates, targets.carbohydrates),
            fats: diff(self.fats, targets.fats),
        }
    }
}

/// Diet macro targets as stored
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecimalTargets {
    pub calories: Option<Decimal>,
    pub proteins: Option<Decimal>,
    pub carbohydrates: Option<Decimal>,
    pub fats: Option<Decimal>,
}

impl DecimalTargets {
    pub fn to_response(&self) -> MacroTargets {
        let to_f64 = |value: Option<Decimal>| value.map(round1);

        MacroTargets {
            calories: to_f64(self.calories),
            proteins: to_f64(self.proteins),
            carbohydrates: to_f64(self.carbohydrates),
            fats: to_f64(self.fats),
        }
    }
}

/// Contribution of `value` (per serving) at `quantity`
pub fn scaled(value: Decimal, quantity: Decimal, serving_size: Decimal) -> Decimal {
    let divisor = if serving_size.is_zero() {
        DEFAULT_SERVING_SIZE
    } else {
        serving_size
    };

    value * quantity / divisor
}

/// Round to one decimal place, midpoint away from zero
pub fn round1(value: Decimal) -> f64 {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    // no negative zero in responses
    if rounded.is_zero() {
        return 0.0;
    }
    dec_to_f64(rounded)
}

/// Sum every line into one total
pub fn aggregate(lines: &[NutritionLineRecord], micronutrients: &[FoodMicronutrientRecord]) -> RawTotals {
    let by_food = group_micronutrients(micronutrients);
    let mut totals = RawTotals::default();

    for line in lines {
        let micros = by_food.get(&line.food_id).map(Vec::as_slice).unwrap_or_default();
        totals.add_line(line, micros);
    }

    totals
}

/// Sum lines separately for each meal
pub fn aggregate_by_meal(
    lines: &[NutritionLineRecord],
    micronutrients: &[FoodMicronutrientRecord],
) -> HashMap<Uuid, RawTotals> {
    let by_food = group_micronutrients(micronutrients);
    let mut totals: HashMap<Uuid, RawTotals> = HashMap::new();

    for line in lines {
        let micros = by_food.get(&line.food_id).map(Vec::as_slice).unwrap_or_default();
        totals.entry(line.meal_id).or_default().add_line(line, micros);
    }

    totals
}

fn group_micronutrients(
    micronutrients: &[FoodMicronutrientRecord],
) -> HashMap<Uuid, Vec<FoodMicronutrientRecord>> {
    let mut by_food: HashMap<Uuid, Vec<FoodMicronutrientRecord>> = HashMap::new();
    for micro in micronutrients {
        by_food.entry(micro.food_id).or_default().push(micro.clone());
    }
    by_food
}

fn distinct_food_ids(lines: &[NutritionLineRecord]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = lines.iter().map(|line| line.food_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Loads food lines and computes totals
pub struct NutritionService;

impl NutritionService {
    /// Totals per meal; meals without foods map to zero totals
    pub async fn meal_totals(
        db: &PgPool,
        meal_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, NutritionTotals>, ApiError> {
        let lines = NutritionRepository::meal_lines(db, meal_ids)
            .await
            .map_err(ApiError::Internal)?;
        let micronutrients = FoodRepository::micronutrients_for(db, &distinct_food_ids(&lines))
            .await
            .map_err(ApiError::Internal)?;

        let raw = aggregate_by_meal(&lines, &micronutrients);

        Ok(meal_ids
            .iter()
            .map(|id| {
                let totals = raw.get(id).map(RawTotals::rounded).unwrap_or_default();
                (*id, totals)
            })
            .collect())
    }

    /// Raw totals of a diet, optionally for one weekday
    pub async fn diet_totals(db: &PgPool, diet_id: Uuid, day: Option<i16>) -> Result<RawTotals, ApiError> {
        let lines = NutritionRepository::diet_lines(db, diet_id, day)
            .await
            .map_err(ApiError::Internal)?;
        let micronutrients = FoodRepository::micronutrients_for(db, &distinct_food_ids(&lines))
            .await
            .map_err(ApiError::Internal)?;

        Ok(aggregate(&lines, &micronutrients))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(meal_id: Uuid, food_id: Uuid, quantity: i64, serving_size: i64, calories: i64) -> NutritionLineRecord {
        NutritionLineRecord {
            meal_id,
            food_id,
            food_name: "food".to_string(),
            quantity: Decimal::from(quantity),
            serving_size: Decimal::from(serving_size),
            calories: Decimal::from(calories),
            proteins: Decimal::ZERO,
            carbohydrates: Decimal::ZERO,
            fats: Decimal::ZERO,
            fiber: None,
            sodium: None,
        }
    }

    fn micro(food_id: Uuid, name: &str, amount: Decimal) -> FoodMicronutrientRecord {
        FoodMicronutrientRecord {
            food_id,
            micronutrient_id: Uuid::new_v4(),
            name: name.to_string(),
            unit: "mg".to_string(),
            amount,
        }
    }

    #[test]
    fn test_chicken_breast_at_150_grams() {
        let food_id = Uuid::new_v4();
        let mut chicken = line(Uuid::new_v4(), food_id, 150, 100, 165);
        chicken.proteins = Decimal::from(31);

        let totals = aggregate(&[chicken], &[]).rounded();

        assert_eq!(totals.calories, 247.5);
        assert_eq!(totals.proteins, 46.5);
        assert_eq!(totals.fiber, 0.0);
    }

    #[test]
    fn test_half_serving() {
        let totals = aggregate(&[line(Uuid::new_v4(), Uuid::new_v4(), 50, 100, 100)], &[]).rounded();
        assert_eq!(totals.calories, 50.0);
    }

    #[test]
    fn test_zero_serving_size_divides_by_100() {
        let totals = aggregate(&[line(Uuid::new_v4(), Uuid::new_v4(), 200, 0, 30)], &[]).rounded();
        assert_eq!(totals.calories, 60.0);
    }

    #[test]
    fn test_rounding_is_midpoint_away_from_zero() {
        assert_eq!(round1(Decimal::new(25, 2)), 0.3);
        assert_eq!(round1(Decimal::new(-25, 2)), -0.3);
        assert_eq!(round1(Decimal::new(24, 2)), 0.2);
    }

    #[test]
    fn test_micronutrients_summed_by_name_and_sorted() {
        let spinach = Uuid::new_v4();
        let beef = Uuid::new_v4();
        let lines = vec![
            line(Uuid::new_v4(), spinach, 200, 100, 23),
            line(Uuid::new_v4(), beef, 50, 100, 250),
        ];
        let micros = vec![
            micro(spinach, "Iron", Decimal::new(27, 1)),
            micro(spinach, "Calcium", Decimal::from(99)),
            micro(beef, "Iron", Decimal::from(2)),
            micro(beef, "Zinc", Decimal::from(6)),
        ];

        let totals = aggregate(&lines, &micros).rounded();
        let names: Vec<&str> = totals.micronutrients.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, vec!["Calcium", "Iron", "Zinc"]);
        assert_eq!(totals.micronutrients[0].amount, 198.0);
        // 2.7 * 2 + 2 * 0.5
        assert_eq!(totals.micronutrients[1].amount, 6.4);
        assert_eq!(totals.micronutrients[2].amount, 3.0);
    }

    #[test]
    fn test_repeated_meal_counts_twice() {
        let meal = Uuid::new_v4();
        let food = Uuid::new_v4();
        let once = aggregate(&[line(meal, food, 100, 100, 120)], &[]);
        let twice = aggregate(&[line(meal, food, 100, 100, 120), line(meal, food, 100, 100, 120)], &[]);

        assert_eq!(twice.calories, once.calories * Decimal::TWO);
    }

    #[test]
    fn test_difference_uses_unrounded_actuals() {
        let mut totals = RawTotals::default();
        totals.calories = Decimal::new(180_04, 2);
        totals.proteins = Decimal::new(1005, 1);

        let targets = DecimalTargets {
            calories: Some(Decimal::from(2000)),
            proteins: Some(Decimal::from(150)),
            carbohydrates: None,
            fats: None,
        };

        let diff = totals.difference(&targets);
        assert_eq!(diff.calories, Some(-1820.0));
        assert_eq!(diff.proteins, Some(-49.5));
        assert_eq!(diff.carbohydrates, None);
        assert_eq!(diff.fats, None);
    }

    #[test]
    fn test_grouped_by_meal() {
        let breakfast = Uuid::new_v4();
        let lunch = Uuid::new_v4();
        let food = Uuid::new_v4();
        let lines = vec![
            line(breakfast, food, 100, 100, 100),
            line(lunch, food, 300, 100, 100),
        ];

        let by_meal = aggregate_by_meal(&lines, &[]);
        assert_eq!(by_meal[&breakfast].rounded().calories, 100.0);
        assert_eq!(by_meal[&lunch].rounded().calories, 300.0);
    }

    fn arb_lines() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
        prop::collection::vec(
            (0i64..1000, prop::sample::select(vec![0i64, 50, 100, 200, 250]), 0i64..900),
            0..20,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_aggregation_is_idempotent(specs in arb_lines()) {
            let meal = Uuid::new_v4();
            let lines: Vec<_> = specs
                .iter()
                .map(|(q, s, c)| line(meal, Uuid::new_v4(), *q, *s, *c))
                .collect();

            prop_assert_eq!(aggregate(&lines, &[]).rounded(), aggregate(&lines, &[]).rounded());
        }

        #[test]
        fn test_aggregation_ignores_line_order(specs in arb_lines()) {
            let meal = Uuid::new_v4();
            let lines: Vec<_> = specs
                .iter()
                .map(|(q, s, c)| line(meal, Uuid::new_v4(), *q, *s, *c))
                .collect();
            let mut reversed = lines.clone();
            reversed.reverse();

            prop_assert_eq!(aggregate(&lines, &[]), aggregate(&reversed, &[]));
        }

        #[test]
        fn test_total_equals_sum_of_scaled_lines(specs in arb_lines()) {
            let meal = Uuid::new_v4();
            let lines: Vec<_> = specs
                .iter()
                .map(|(q, s, c)| line(meal, Uuid::new_v4(), *q, *s, *c))
                .collect();

            let expected: Decimal = lines
                .iter()
                .map(|l| scaled(l.calories, l.quantity, l.serving_size))
                .sum();

            prop_assert_eq!(aggregate(&lines, &[]).calories, expected);
        }

        #[test]
        fn test_totals_never_negative(specs in arb_lines()) {
            let meal = Uuid::new_v4();
            let lines: Vec<_> = specs
                .iter()
                .map(|(q, s, c)| line(meal, Uuid::new_v4(), *q, *s, *c))
                .collect();

            prop_assert!(aggregate(&lines, &[]).rounded().calories >= 0.0);
        }
    }
}
