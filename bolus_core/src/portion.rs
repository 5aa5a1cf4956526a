//! Portion arithmetic for food lookups feeding the calculator.

use crate::round::round1;
use crate::types::FoodTag;

/// Carbohydrate grams in a portion, from a per-100 g (or per-100 ml) value.
/// Rounded to one decimal; a non-positive portion yields 0.
pub fn carbs_for_portion(per_hundred: f64, portion: f64) -> f64 {
    if portion <= 0.0 {
        return 0.0;
    }
    round1(per_hundred / 100.0 * portion)
}

/// Unit the portion is measured in: drinks tagged as alcohol are in ml.
pub fn portion_unit(tags: &[FoodTag]) -> &'static str {
    if tags.contains(&FoodTag::Alcohol) {
        "ml"
    } else {
        "g"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portion_carbs_round_to_one_decimal() {
        assert_eq!(carbs_for_portion(75.0, 80.0), 60.0);
        assert_eq!(carbs_for_portion(17.0, 150.0), 25.5);
        assert_eq!(carbs_for_portion(77.43, 33.0), 25.6);
        assert_eq!(carbs_for_portion(45.0, 0.0), 0.0);
    }

    #[test]
    fn alcohol_is_measured_in_ml() {
        assert_eq!(portion_unit(&[FoodTag::Alcohol]), "ml");
        assert_eq!(portion_unit(&[FoodTag::LowGi]), "g");
        assert_eq!(portion_unit(&[]), "g");
    }
}
