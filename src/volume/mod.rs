//! Drink volume handling
//!
//! Parses serving units and converts drink volumes to milliliters.

pub mod converter;
pub mod units;

pub use converter::{parse_unit, to_ml};
pub use units::{ml_per_unit, ParsedUnit, VolumeUnit};
