//! Volume parsing and conversion

use super::units::{ParsedUnit, VolumeUnit};

/// Parse a unit string, extracting any milliliter annotation
///
/// Examples:
/// - "ml" -> ParsedUnit { base_unit: "ml", ml_amount: None, .. }
/// - "can (440ml)" -> ParsedUnit { base_unit: "can", ml_amount: Some(440.0), .. }
/// - "bottle (750 ml)" -> ParsedUnit { base_unit: "bottle", ml_amount: Some(750.0), unit: None }
pub fn parse_unit(unit_str: &str) -> ParsedUnit {
    let trimmed = unit_str.trim();

    if let (Some(open), Some(close)) = (trimmed.find('('), trimmed.find(')')) {
        if open < close {
            let base_unit = trimmed[..open].trim().to_lowercase();
            let ml_amount = parse_ml_annotation(&trimmed[open + 1..close]);
            let unit = VolumeUnit::from_str(&base_unit);
            return ParsedUnit {
                base_unit,
                ml_amount,
                unit,
            };
        }
    }

    let base_unit = trimmed.to_lowercase();
    let unit = VolumeUnit::from_str(&base_unit);
    ParsedUnit {
        base_unit,
        ml_amount: None,
        unit,
    }
}

/// Parse an annotation like "440ml", "440 ml" or "44cl"
fn parse_ml_annotation(s: &str) -> Option<f64> {
    let lower = s.trim().to_lowercase();

    for (suffix, factor) in [("ml", 1.0), ("cl", 10.0), ("l", 1000.0)] {
        if let Some(num) = lower.strip_suffix(suffix) {
            if let Ok(val) = num.trim().parse::<f64>() {
                return Some(val * factor);
            }
        }
    }

    None
}

/// Convert a quantity in the given unit to milliliters
///
/// An annotation takes precedence over the base unit. Returns None when the
/// unit is not recognized.
pub fn to_ml(quantity: f64, unit: &str) -> Option<f64> {
    let parsed = parse_unit(unit);

    if let Some(ml_per) = parsed.ml_amount {
        return Some(quantity * ml_per);
    }

    parsed.unit.map(|u| quantity * u.ml())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::units::{ML_PER_PINT, ML_PER_SHOT};

    #[test]
    fn test_parse_unit_simple() {
        let parsed = parse_unit("ml");
        assert_eq!(parsed.base_unit, "ml");
        assert_eq!(parsed.ml_amount, None);
        assert_eq!(parsed.unit, Some(VolumeUnit::Ml));
    }

    #[test]
    fn test_parse_unit_with_annotation() {
        let parsed = parse_unit("Can (440ml)");
        assert_eq!(parsed.base_unit, "can");
        assert_eq!(parsed.ml_amount, Some(440.0));
        assert_eq!(parsed.unit, Some(VolumeUnit::Can));
    }

    #[test]
    fn test_parse_unit_custom_with_annotation() {
        let parsed = parse_unit("bottle (75 cl)");
        assert_eq!(parsed.base_unit, "bottle");
        assert_eq!(parsed.ml_amount, Some(750.0));
        assert_eq!(parsed.unit, None);
    }

    #[test]
    fn test_to_ml() {
        assert_eq!(to_ml(330.0, "ml"), Some(330.0));
        assert!((to_ml(1.0, "pint").unwrap() - ML_PER_PINT).abs() < 1e-9);
        assert_eq!(to_ml(2.0, "shot"), Some(2.0 * ML_PER_SHOT));
        assert_eq!(to_ml(2.0, "can (440ml)"), Some(880.0));
        assert_eq!(to_ml(1.0, "bottle (0.75l)"), Some(750.0));
        assert_eq!(to_ml(1.0, "bucket"), None);
    }
}
