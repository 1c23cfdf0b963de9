//! Volume units and conversion constants

use serde::{Deserialize, Serialize};

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per centiliter
pub const ML_PER_CL: f64 = 10.0;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per US fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per imperial fluid ounce
pub const ML_PER_UK_FL_OZ: f64 = 28.4131;
/// Milliliters per imperial pint
pub const ML_PER_PINT: f64 = 568.261;
/// Milliliters per US pint
pub const ML_PER_US_PINT: f64 = 473.176;
/// Standard can
pub const ML_PER_CAN: f64 = 330.0;
/// Single measure of spirits
pub const ML_PER_SHOT: f64 = 25.0;

/// Recognized drink volume units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    Ml,
    Cl,
    Liter,
    FlOz,
    UkFlOz,
    Pint,
    UsPint,
    Can,
    Shot,
}

impl VolumeUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Some(VolumeUnit::Ml),
            "cl" | "centiliter" | "centiliters" | "centilitre" | "centilitres" => Some(VolumeUnit::Cl),
            "l" | "liter" | "liters" | "litre" | "litres" => Some(VolumeUnit::Liter),
            "fl_oz" | "fl oz" | "floz" | "oz" | "fluid ounce" | "fluid ounces" => Some(VolumeUnit::FlOz),
            "uk_fl_oz" | "uk fl oz" | "imperial fl oz" => Some(VolumeUnit::UkFlOz),
            "pint" | "pints" | "uk_pint" | "uk pint" => Some(VolumeUnit::Pint),
            "us_pint" | "us pint" | "us pints" => Some(VolumeUnit::UsPint),
            "can" | "cans" => Some(VolumeUnit::Can),
            "shot" | "shots" | "measure" => Some(VolumeUnit::Shot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeUnit::Ml => "ml",
            VolumeUnit::Cl => "cl",
            VolumeUnit::Liter => "l",
            VolumeUnit::FlOz => "fl_oz",
            VolumeUnit::UkFlOz => "uk_fl_oz",
            VolumeUnit::Pint => "pint",
            VolumeUnit::UsPint => "us_pint",
            VolumeUnit::Can => "can",
            VolumeUnit::Shot => "shot",
        }
    }

    pub fn ml(&self) -> f64 {
        match self {
            VolumeUnit::Ml => 1.0,
            VolumeUnit::Cl => ML_PER_CL,
            VolumeUnit::Liter => ML_PER_LITER,
            VolumeUnit::FlOz => ML_PER_FL_OZ,
            VolumeUnit::UkFlOz => ML_PER_UK_FL_OZ,
            VolumeUnit::Pint => ML_PER_PINT,
            VolumeUnit::UsPint => ML_PER_US_PINT,
            VolumeUnit::Can => ML_PER_CAN,
            VolumeUnit::Shot => ML_PER_SHOT,
        }
    }

    pub fn all() -> &'static [VolumeUnit] {
        &[
            VolumeUnit::Ml,
            VolumeUnit::Cl,
            VolumeUnit::Liter,
            VolumeUnit::FlOz,
            VolumeUnit::UkFlOz,
            VolumeUnit::Pint,
            VolumeUnit::UsPint,
            VolumeUnit::Can,
            VolumeUnit::Shot,
        ]
    }
}

/// A parsed unit with optional milliliter annotation, e.g. `can (440ml)`
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub base_unit: String,
    pub ml_amount: Option<f64>,
    pub unit: Option<VolumeUnit>,
}

/// Conversion factor to milliliters for a unit string
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    VolumeUnit::from_str(unit).map(|u| u.ml())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_aliases() {
        assert_eq!(VolumeUnit::from_str("ML"), Some(VolumeUnit::Ml));
        assert_eq!(VolumeUnit::from_str("litre"), Some(VolumeUnit::Liter));
        assert_eq!(VolumeUnit::from_str("fl-oz"), Some(VolumeUnit::FlOz));
        assert_eq!(VolumeUnit::from_str("us pint"), Some(VolumeUnit::UsPint));
        assert_eq!(VolumeUnit::from_str("bucket"), None);
    }

    #[test]
    fn test_ml_per_unit() {
        assert_eq!(ml_per_unit("ml"), Some(1.0));
        assert_eq!(ml_per_unit("cl"), Some(ML_PER_CL));
        assert_eq!(ml_per_unit("pint"), Some(ML_PER_PINT));
        assert_eq!(ml_per_unit("shot"), Some(ML_PER_SHOT));
        assert_eq!(ml_per_unit("g"), None);
    }

    #[test]
    fn test_round_trip_names() {
        for unit in VolumeUnit::all() {
            assert_eq!(VolumeUnit::from_str(unit.as_str()), Some(*unit));
        }
    }
}
