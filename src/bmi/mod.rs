//! BMI module
//!
//! Unit conversion and BMI calculation.

pub mod calculator;
pub mod units;

pub use calculator::{
    category_for, compute_bmi, description_for, ideal_weight_range, BmiCategory, BmiResult,
    IdealWeightRange,
};
pub use units::{
    centimeters_to_inches, centimeters_to_meters, inches_to_centimeters, kilograms_to_pounds,
    pounds_to_kilograms, HeightUnit, HeightValue, WeightUnit, WeightValue,
};
