//! Unit types and conversion functions
//!
//! Weight and height units, their storage strings, and the pure conversions
//! between pounds/kilograms and inches/centimeters/meters. Nothing here
//! rejects zero or negative magnitudes; range checks live in `validation`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Centimeters per meter
pub const CM_PER_M: f64 = 100.0;

// ============================================================================
// Conversions
// ============================================================================

pub fn pounds_to_kilograms(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

pub fn kilograms_to_pounds(kg: f64) -> f64 {
    kg / KG_PER_LB
}

pub fn inches_to_centimeters(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

pub fn centimeters_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

pub fn centimeters_to_meters(cm: f64) -> f64 {
    cm / CM_PER_M
}

// ============================================================================
// Units
// ============================================================================

/// Unit a weight was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "lbs")]
    Pounds,
}

impl WeightUnit {
    /// Storage string ("kg" or "lbs")
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lbs",
        }
    }

    /// Parse a unit string, accepting common spellings
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(WeightUnit::Kilograms),
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Pounds),
            _ => None,
        }
    }
}

/// Unit a height was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeightUnit {
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "inches")]
    Inches,
}

impl HeightUnit {
    /// Storage string ("cm" or "inches")
    pub fn as_str(&self) -> &'static str {
        match self {
            HeightUnit::Centimeters => "cm",
            HeightUnit::Inches => "inches",
        }
    }

    /// Parse a unit string, accepting common spellings
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Some(HeightUnit::Centimeters)
            }
            "in" | "inch" | "inches" => Some(HeightUnit::Inches),
            _ => None,
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A weight magnitude tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightValue {
    pub magnitude: f64,
    pub unit: WeightUnit,
}

impl WeightValue {
    pub fn new(magnitude: f64, unit: WeightUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn to_kilograms(&self) -> f64 {
        match self.unit {
            WeightUnit::Kilograms => self.magnitude,
            WeightUnit::Pounds => pounds_to_kilograms(self.magnitude),
        }
    }

    pub fn to_pounds(&self) -> f64 {
        match self.unit {
            WeightUnit::Kilograms => kilograms_to_pounds(self.magnitude),
            WeightUnit::Pounds => self.magnitude,
        }
    }

    /// Magnitude expressed in `unit`
    pub fn in_unit(&self, unit: WeightUnit) -> f64 {
        match unit {
            WeightUnit::Kilograms => self.to_kilograms(),
            WeightUnit::Pounds => self.to_pounds(),
        }
    }
}

/// A height magnitude tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightValue {
    pub magnitude: f64,
    pub unit: HeightUnit,
}

impl HeightValue {
    pub fn new(magnitude: f64, unit: HeightUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn to_centimeters(&self) -> f64 {
        match self.unit {
            HeightUnit::Centimeters => self.magnitude,
            HeightUnit::Inches => inches_to_centimeters(self.magnitude),
        }
    }

    pub fn to_inches(&self) -> f64 {
        match self.unit {
            HeightUnit::Centimeters => centimeters_to_inches(self.magnitude),
            HeightUnit::Inches => self.magnitude,
        }
    }

    /// Inches go through centimeters first
    pub fn to_meters(&self) -> f64 {
        centimeters_to_meters(self.to_centimeters())
    }

    /// Magnitude expressed in `unit`
    pub fn in_unit(&self, unit: HeightUnit) -> f64 {
        match unit {
            HeightUnit::Centimeters => self.to_centimeters(),
            HeightUnit::Inches => self.to_inches(),
        }
    }
}
