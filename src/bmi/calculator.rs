//! BMI calculation
//!
//! Applies the BMI formula (kg / m²), classifies the result, and derives the
//! ideal weight range for a height. Every function is pure.

use serde::{Deserialize, Serialize};

use super::units::{HeightUnit, HeightValue, WeightUnit, WeightValue};

/// Lower BMI bound of the ideal weight range
pub const IDEAL_BMI_MIN: f64 = 18.5;
/// Upper BMI bound of the ideal weight range
pub const IDEAL_BMI_MAX: f64 = 24.9;

/// Category thresholds (each is the inclusive lower bound of the next category)
pub const NORMAL_THRESHOLD: f64 = 18.5;
pub const OVERWEIGHT_THRESHOLD: f64 = 25.0;
pub const OBESE_THRESHOLD: f64 = 30.0;

/// BMI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    /// Classify a BMI value.
    ///
    /// The intervals are half-open and closed on the lower end:
    /// `< 18.5`, `[18.5, 25)`, `[25, 30)`, `>= 30`. Infinities fall into the
    /// outer categories. NaN is the only value without a category.
    pub fn from_bmi(bmi: f64) -> Option<Self> {
        if bmi.is_nan() {
            None
        } else if bmi < NORMAL_THRESHOLD {
            Some(BmiCategory::Underweight)
        } else if bmi < OVERWEIGHT_THRESHOLD {
            Some(BmiCategory::Normal)
        } else if bmi < OBESE_THRESHOLD {
            Some(BmiCategory::Overweight)
        } else {
            Some(BmiCategory::Obese)
        }
    }

    /// Storage / display string
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "underweight" => Some(BmiCategory::Underweight),
            "normal" => Some(BmiCategory::Normal),
            "overweight" => Some(BmiCategory::Overweight),
            "obese" => Some(BmiCategory::Obese),
            _ => None,
        }
    }

    /// Advisory sentence for the category. Informational only.
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "You may be underweight. Consider consulting a healthcare provider."
            }
            BmiCategory::Normal => "You have a healthy weight. Keep up the good work!",
            BmiCategory::Overweight => {
                "You may be overweight. Consider healthy lifestyle changes."
            }
            BmiCategory::Obese => "You may be obese. Consult a healthcare provider for guidance.",
        }
    }

    /// BMI range label for the reference table
    pub fn range_label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "< 18.5",
            BmiCategory::Normal => "18.5 - 24.9",
            BmiCategory::Overweight => "25 - 29.9",
            BmiCategory::Obese => "≥ 30",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute BMI from a weight and height in any supported units.
///
/// A zero height yields an infinite or NaN result; callers validate first.
pub fn compute_bmi(
    weight: f64,
    weight_unit: WeightUnit,
    height: f64,
    height_unit: HeightUnit,
) -> f64 {
    let weight_kg = WeightValue::new(weight, weight_unit).to_kilograms();
    let height_m = HeightValue::new(height, height_unit).to_meters();
    weight_kg / (height_m * height_m)
}

/// Classify a BMI value (see [`BmiCategory::from_bmi`])
pub fn category_for(bmi: f64) -> Option<BmiCategory> {
    BmiCategory::from_bmi(bmi)
}

pub fn description_for(category: BmiCategory) -> &'static str {
    category.description()
}

/// Weight bounds, in kilograms, for a BMI between 18.5 and 24.9
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightRange {
    pub min_kg: f64,
    pub max_kg: f64,
}

impl IdealWeightRange {
    /// Bounds expressed in `unit`
    pub fn in_unit(&self, unit: WeightUnit) -> (f64, f64) {
        (
            WeightValue::new(self.min_kg, WeightUnit::Kilograms).in_unit(unit),
            WeightValue::new(self.max_kg, WeightUnit::Kilograms).in_unit(unit),
        )
    }

    pub fn contains(&self, weight_kg: f64) -> bool {
        weight_kg >= self.min_kg && weight_kg <= self.max_kg
    }
}

pub fn ideal_weight_range(height: f64, height_unit: HeightUnit) -> IdealWeightRange {
    let height_m = HeightValue::new(height, height_unit).to_meters();
    let height_m2 = height_m * height_m;
    IdealWeightRange {
        min_kg: IDEAL_BMI_MIN * height_m2,
        max_kg: IDEAL_BMI_MAX * height_m2,
    }
}

/// A computed BMI with its derived category and description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
    pub description: &'static str,
}

impl BmiResult {
    /// Wrap a BMI value. Returns `None` for non-finite values.
    pub fn from_value(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let category = BmiCategory::from_bmi(value)?;
        Some(Self {
            value,
            category,
            description: category.description(),
        })
    }

    pub fn calculate(weight: WeightValue, height: HeightValue) -> Option<Self> {
        Self::from_value(compute_bmi(
            weight.magnitude,
            weight.unit,
            height.magnitude,
            height.unit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_bmi_metric() {
        let bmi = compute_bmi(70.0, WeightUnit::Kilograms, 175.0, HeightUnit::Centimeters);
        assert!((bmi - 22.857).abs() < 0.001);
    }

    #[test]
    fn test_compute_bmi_imperial() {
        let bmi = compute_bmi(154.0, WeightUnit::Pounds, 69.0, HeightUnit::Inches);
        assert!((bmi - 22.74).abs() < 0.1);
    }

    #[test]
    fn test_compute_bmi_mixed_units() {
        // 70 kg at 69 in (175.26 cm)
        let bmi = compute_bmi(70.0, WeightUnit::Kilograms, 69.0, HeightUnit::Inches);
        assert!((bmi - 70.0 / (1.7526 * 1.7526)).abs() < 1e-9);
    }

    #[test]
    fn test_compute_bmi_zero_height_is_not_finite() {
        let bmi = compute_bmi(70.0, WeightUnit::Kilograms, 0.0, HeightUnit::Centimeters);
        assert!(bmi.is_infinite());
        assert!(BmiResult::from_value(bmi).is_none());
    }

    #[test]
    fn test_category_boundaries_closed_on_lower_end() {
        assert_eq!(category_for(18.49), Some(BmiCategory::Underweight));
        assert_eq!(category_for(18.5), Some(BmiCategory::Normal));
        assert_eq!(category_for(24.99), Some(BmiCategory::Normal));
        assert_eq!(category_for(25.0), Some(BmiCategory::Overweight));
        assert_eq!(category_for(29.99), Some(BmiCategory::Overweight));
        assert_eq!(category_for(30.0), Some(BmiCategory::Obese));
    }

    #[test]
    fn test_category_partition_is_total_over_finite_values() {
        let mut x = -50.0;
        while x < 100.0 {
            let matching = BmiCategory::ALL
                .iter()
                .filter(|c| match c {
                    BmiCategory::Underweight => x < 18.5,
                    BmiCategory::Normal => (18.5..25.0).contains(&x),
                    BmiCategory::Overweight => (25.0..30.0).contains(&x),
                    BmiCategory::Obese => x >= 30.0,
                })
                .count();
            assert_eq!(matching, 1, "value {x} matched {matching} intervals");
            assert!(category_for(x).is_some());
            x += 0.25;
        }
        assert_eq!(category_for(f64::MIN), Some(BmiCategory::Underweight));
        assert_eq!(category_for(f64::MAX), Some(BmiCategory::Obese));
    }

    #[test]
    fn test_category_non_finite() {
        assert_eq!(category_for(f64::NAN), None);
        assert_eq!(category_for(f64::NEG_INFINITY), Some(BmiCategory::Underweight));
        assert_eq!(category_for(f64::INFINITY), Some(BmiCategory::Obese));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            description_for(BmiCategory::Normal),
            "You have a healthy weight. Keep up the good work!"
        );
        assert!(description_for(BmiCategory::Obese).starts_with("You may be obese"));
    }

    #[test]
    fn test_category_string_round_trip() {
        for category in BmiCategory::ALL {
            assert_eq!(BmiCategory::from_str(category.as_str()), Some(category));
        }
        assert_eq!(BmiCategory::from_str("Unknown"), None);
    }

    #[test]
    fn test_ideal_weight_range() {
        let range = ideal_weight_range(180.0, HeightUnit::Centimeters);
        assert!((range.min_kg - 59.94).abs() < 1e-9);
        assert!((range.max_kg - 80.676).abs() < 1e-9);
        assert!(range.min_kg < range.max_kg);
        assert!(range.contains(70.0));
        assert!(!range.contains(90.0));
    }

    #[test]
    fn test_ideal_weight_range_inches_and_pounds() {
        let range = ideal_weight_range(69.0, HeightUnit::Inches);
        let (min_lbs, max_lbs) = range.in_unit(WeightUnit::Pounds);
        assert!((range.min_kg - 18.5 * 1.7526 * 1.7526).abs() < 1e-9);
        assert!(min_lbs > range.min_kg);
        assert!(max_lbs > min_lbs);
    }

    #[test]
    fn test_bmi_result_calculate() {
        let result = BmiResult::calculate(
            WeightValue::new(70.0, WeightUnit::Kilograms),
            HeightValue::new(175.0, HeightUnit::Centimeters),
        )
        .unwrap();
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.description, BmiCategory::Normal.description());

        let result = BmiResult::calculate(
            WeightValue::new(100.0, WeightUnit::Kilograms),
            HeightValue::new(170.0, HeightUnit::Centimeters),
        )
        .unwrap();
        assert_eq!(result.category, BmiCategory::Obese);
    }
}
