//! Brain region table
//!
//! Static definitions of the modeled brain regions and how strongly each one
//! amplifies the session's overall impact. The table is a plain value handed
//! to the analyzer, so alternate tables can be used in tests.

use serde::{Deserialize, Serialize};

/// One modeled brain region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainRegionDefinition {
    /// Stable identifier, e.g. `frontalLobe`
    pub key: String,
    /// Localization key for the display name, e.g. `region_frontalLobe`
    pub display_name_key: String,
    /// Human-readable description of the region's role
    pub functions: String,
    /// Multiplier applied to the overall impact (> 0)
    pub sensitivity: f64,
}

impl BrainRegionDefinition {
    pub fn new(key: &str, functions: &str, sensitivity: f64) -> Self {
        Self {
            key: key.to_string(),
            display_name_key: format!("region_{}", key),
            functions: functions.to_string(),
            sensitivity,
        }
    }
}

/// Immutable set of region definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    regions: Vec<BrainRegionDefinition>,
}

impl RegionTable {
    pub fn new(regions: Vec<BrainRegionDefinition>) -> Self {
        Self { regions }
    }

    /// The six regions of the standard model
    pub fn standard() -> Self {
        Self::new(vec![
            BrainRegionDefinition::new(
                "frontalLobe",
                "Judgment, planning, social conduct, and speech.",
                1.2,
            ),
            BrainRegionDefinition::new(
                "parietalLobe",
                "Sensory information, perception, and spatial awareness.",
                0.9,
            ),
            BrainRegionDefinition::new(
                "occipitalLobe",
                "Visual processing and interpretation.",
                0.8,
            ),
            BrainRegionDefinition::new(
                "temporalLobe",
                "Auditory processing and language comprehension.",
                1.0,
            ),
            BrainRegionDefinition::new(
                "cerebellum",
                "Coordination, balance, and motor control.",
                1.5,
            ),
            BrainRegionDefinition::new(
                "brainstem",
                "Controls vital functions like breathing, heart rate, and consciousness.",
                2.0,
            ),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrainRegionDefinition> {
        self.regions.iter()
    }

    pub fn get(&self, key: &str) -> Option<&BrainRegionDefinition> {
        self.regions.iter().find(|r| r.key == key)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::standard()
    }
}
