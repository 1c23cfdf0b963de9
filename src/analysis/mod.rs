//! Consumption analysis engine
//!
//! Pure computation: alcohol quantity derivation and the brain impact model.
//! Nothing here touches the database or the clock.

pub mod impact;
pub mod localizer;
pub mod quantity;
pub mod regions;

pub use impact::{
    ImpactAnalyzer, ImpactLevel, ImpactPolicy, RegionImpactMap, RegionImpactResult,
    SessionAssessment,
};
pub use localizer::{Localizer, MessageCatalog, DEFAULT_LANGUAGE};
pub use quantity::{derive_alcohol_grams, AlcoholContent, ETHANOL_DENSITY_G_PER_ML};
pub use regions::{BrainRegionDefinition, RegionTable};
