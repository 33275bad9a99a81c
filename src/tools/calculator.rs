//! Calculator MCP Tools
//!
//! Stateless BMI, ideal-weight and unit conversion tools. Nothing here
//! touches the database.

use serde::Serialize;

use super::{parse_height_unit, parse_weight_unit};
use crate::bmi::units::CM_PER_M;
use crate::bmi::{
    centimeters_to_meters, compute_bmi, ideal_weight_range as ideal_range_for, BmiCategory, BmiResult,
    HeightUnit, HeightValue, IdealWeightRange, WeightUnit, WeightValue,
};
use crate::validation::{parse_height, parse_weight};

/// How a BMI was derived from the inputs
#[derive(Debug, Serialize)]
pub struct FormulaBreakdown {
    pub weight_kg: f64,
    pub height_m: f64,
    pub bmi: f64,
    pub formula: String,
}

/// Ideal weight range in kilograms and in a display unit
#[derive(Debug, Serialize)]
pub struct IdealWeightResponse {
    pub min_kg: f64,
    pub max_kg: f64,
    pub min: f64,
    pub max: f64,
    pub unit: WeightUnit,
    pub display: String,
}

/// Response for calculate_bmi
#[derive(Debug, Serialize)]
pub struct BmiCalculationResponse {
    pub bmi: f64,
    pub bmi_display: String,
    pub category: BmiCategory,
    pub description: &'static str,
    pub breakdown: FormulaBreakdown,
    pub ideal_weight: IdealWeightResponse,
    pub within_ideal_range: bool,
}

/// Response for convert_measurement
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub value: f64,
    pub from_unit: String,
    pub converted: f64,
    pub to_unit: String,
}

pub fn formula_breakdown(weight: WeightValue, height: HeightValue) -> FormulaBreakdown {
    let weight_kg = weight.to_kilograms();
    let height_m = height.to_meters();
    let bmi = compute_bmi(weight.magnitude, weight.unit, height.magnitude, height.unit);
    FormulaBreakdown {
        weight_kg,
        height_m,
        bmi,
        formula: format!("{:.1} kg / ({:.2} m)² = {:.1}", weight_kg, height_m, bmi),
    }
}

pub fn ideal_weight_response(range: IdealWeightRange, unit: WeightUnit) -> IdealWeightResponse {
    let (min, max) = range.in_unit(unit);
    IdealWeightResponse {
        min_kg: range.min_kg,
        max_kg: range.max_kg,
        min,
        max,
        unit,
        display: format!("{:.1} - {:.1} {}", min, max, unit.as_str()),
    }
}

/// Validate raw weight/height text and compute BMI
pub fn calculate_bmi(
    weight: &str,
    weight_unit: &str,
    height: &str,
    height_unit: &str,
) -> Result<BmiCalculationResponse, String> {
    let weight_unit = parse_weight_unit(weight_unit)?;
    let height_unit = parse_height_unit(height_unit)?;
    let weight = parse_weight(weight, weight_unit)?;
    let height = parse_height(height, height_unit)?;

    let result = BmiResult::calculate(weight, height)
        .ok_or_else(|| "BMI could not be calculated from the given values".to_string())?;
    let range = ideal_range_for(height.magnitude, height.unit);

    Ok(BmiCalculationResponse {
        bmi: result.value,
        bmi_display: format!("{:.1}", result.value),
        category: result.category,
        description: result.description,
        breakdown: formula_breakdown(weight, height),
        ideal_weight: ideal_weight_response(range, weight_unit),
        within_ideal_range: range.contains(weight.to_kilograms()),
    })
}

/// Ideal weight range for a height, shown in `weight_unit` (kg by default)
pub fn ideal_weight_range(
    height: &str,
    height_unit: &str,
    weight_unit: Option<&str>,
) -> Result<IdealWeightResponse, String> {
    let height_unit = parse_height_unit(height_unit)?;
    let display_unit = match weight_unit {
        Some(unit) => parse_weight_unit(unit)?,
        None => WeightUnit::Kilograms,
    };
    let height = parse_height(height, height_unit)?;

    Ok(ideal_weight_response(
        ideal_range_for(height.magnitude, height.unit),
        display_unit,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Measure {
    Weight(WeightUnit),
    Length(LengthUnit),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LengthUnit {
    Height(HeightUnit),
    Meters,
}

fn parse_measure(unit: &str) -> Option<Measure> {
    if let Some(u) = WeightUnit::from_str(unit) {
        return Some(Measure::Weight(u));
    }
    if let Some(u) = HeightUnit::from_str(unit) {
        return Some(Measure::Length(LengthUnit::Height(u)));
    }
    match unit.trim().to_lowercase().as_str() {
        "m" | "meter" | "meters" | "metre" | "metres" => Some(Measure::Length(LengthUnit::Meters)),
        _ => None,
    }
}

fn length_to_centimeters(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Height(u) => HeightValue::new(value, u).to_centimeters(),
        LengthUnit::Meters => value * CM_PER_M,
    }
}

fn centimeters_to_length(cm: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Height(u) => HeightValue::new(cm, HeightUnit::Centimeters).in_unit(u),
        LengthUnit::Meters => centimeters_to_meters(cm),
    }
}

/// Convert between kg/lbs or between cm/inches/m
pub fn convert_measurement(
    value: f64,
    from_unit: &str,
    to_unit: &str,
) -> Result<ConversionResponse, String> {
    let unknown = |unit: &str| {
        format!(
            "Unknown unit: '{}'. Valid units: kg, lbs, cm, inches, m",
            unit
        )
    };
    let from = parse_measure(from_unit).ok_or_else(|| unknown(from_unit))?;
    let to = parse_measure(to_unit).ok_or_else(|| unknown(to_unit))?;

    let converted = match (from, to) {
        (Measure::Weight(f), Measure::Weight(t)) => WeightValue::new(value, f).in_unit(t),
        (Measure::Length(f), Measure::Length(t)) => {
            centimeters_to_length(length_to_centimeters(value, f), t)
        }
        _ => {
            return Err(format!(
                "Cannot convert between '{}' and '{}': one is a weight and the other a length",
                from_unit, to_unit
            ))
        }
    };

    Ok(ConversionResponse {
        value,
        from_unit: from_unit.to_string(),
        converted,
        to_unit: to_unit.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_bmi_metric() {
        let response = calculate_bmi("70", "kg", "175", "cm").unwrap();
        assert!((response.bmi - 22.857).abs() < 0.001);
        assert_eq!(response.bmi_display, "22.9");
        assert_eq!(response.category, BmiCategory::Normal);
        assert_eq!(response.breakdown.formula, "70.0 kg / (1.75 m)² = 22.9");
        assert_eq!(response.ideal_weight.unit, WeightUnit::Kilograms);
        assert!(response.within_ideal_range);
        assert_eq!(response.breakdown.bmi, response.bmi);
    }

    #[test]
    fn test_calculate_bmi_outside_ideal_range() {
        let response = calculate_bmi("95", "kg", "175", "cm").unwrap();
        assert_eq!(response.category, BmiCategory::Obese);
        assert!(!response.within_ideal_range);
    }

    #[test]
    fn test_calculate_bmi_imperial_reports_range_in_pounds() {
        let response = calculate_bmi("154", "lbs", "69", "inches").unwrap();
        assert!((response.bmi - 22.74).abs() < 0.1);
        assert_eq!(response.ideal_weight.unit, WeightUnit::Pounds);
        assert!(response.ideal_weight.min > response.ideal_weight.min_kg);
    }

    #[test]
    fn test_calculate_bmi_validation_messages() {
        assert_eq!(
            calculate_bmi("600", "kg", "175", "cm").unwrap_err(),
            "Weight must be between 1 and 500 kg"
        );
        assert_eq!(
            calculate_bmi("70", "kg", "", "cm").unwrap_err(),
            "Height is required"
        );
        // Weight is checked before height
        assert_eq!(
            calculate_bmi("abc", "kg", "", "cm").unwrap_err(),
            "Please enter a valid numeric value"
        );
        assert!(calculate_bmi("70", "stone", "175", "cm").is_err());
    }

    #[test]
    fn test_ideal_weight_range_tool() {
        let response = ideal_weight_range("180", "cm", None).unwrap();
        assert!((response.min_kg - 59.94).abs() < 1e-9);
        assert!((response.max_kg - 80.676).abs() < 1e-9);
        assert_eq!(response.display, "59.9 - 80.7 kg");

        let response = ideal_weight_range("180", "cm", Some("lbs")).unwrap();
        assert!((response.min - 132.145).abs() < 0.01);

        assert_eq!(
            ideal_weight_range("300", "cm", None).unwrap_err(),
            "Height must be between 50 and 250 cm"
        );
    }

    #[test]
    fn test_convert_measurement() {
        let r = convert_measurement(154.0, "lbs", "kg").unwrap();
        assert!((r.converted - 69.853168).abs() < 1e-9);

        let r = convert_measurement(69.0, "inches", "m").unwrap();
        assert!((r.converted - 1.7526).abs() < 1e-9);

        let r = convert_measurement(1.8, "m", "cm").unwrap();
        assert!((r.converted - 180.0).abs() < 1e-9);

        let r = convert_measurement(180.0, "cm", "in").unwrap();
        assert!((r.converted - 70.866).abs() < 0.001);

        let r = convert_measurement(70.0, "kg", "kg").unwrap();
        assert_eq!(r.converted, 70.0);
    }

    #[test]
    fn test_convert_measurement_errors() {
        assert!(convert_measurement(70.0, "kg", "cm").unwrap_err().contains("Cannot convert"));
        assert!(convert_measurement(70.0, "stone", "kg").unwrap_err().contains("Unknown unit"));
    }
}
