//! Brain impact analysis
//!
//! Turns the current set of logged drinks into a per-region impact
//! assessment. The model is illustrative only:
//!
//! 1. Sum grams of alcohol across all drinks.
//! 2. Map the total onto a logarithmic "overall impact" curve capped at 5.
//! 3. Scale by each region's sensitivity (capped again at 5) and bucket the
//!    result into Low / Moderate / High.
//!
//! There is no time decay: every drink handed in counts in full.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::localizer::Localizer;
use super::quantity::AlcoholContent;
use super::regions::{BrainRegionDefinition, RegionTable};

/// Constants of the impact curve and classification thresholds.
///
/// Kept together and versioned so results can be traced back to the policy
/// that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactPolicy {
    pub version: u32,
    /// Grams that make up one unit on the log curve
    pub grams_scale: f64,
    /// Multiplier applied after the log
    pub curve_gain: f64,
    /// Upper bound of every score
    pub max_score: f64,
    /// Scores above this (inclusive upper bound of Low) are Moderate
    pub moderate_above: f64,
    /// Scores above this are High
    pub high_above: f64,
}

impl ImpactPolicy {
    pub const V1: ImpactPolicy = ImpactPolicy {
        version: 1,
        grams_scale: 10.0,
        curve_gain: 1.5,
        max_score: 5.0,
        moderate_above: 1.5,
        high_above: 3.5,
    };

    /// Session-wide impact for `total_grams` of alcohol
    pub fn overall_impact(&self, total_grams: f64) -> f64 {
        if total_grams <= 0.0 {
            return 0.0;
        }
        cap((total_grams / self.grams_scale).ln_1p() * self.curve_gain, self.max_score)
    }

    /// Impact on a region with the given sensitivity
    pub fn region_impact(&self, overall_impact: f64, sensitivity: f64) -> f64 {
        cap(overall_impact * sensitivity, self.max_score)
    }

    pub fn classify(&self, score: f64) -> ImpactLevel {
        if score > self.high_above {
            ImpactLevel::High
        } else if score > self.moderate_above {
            ImpactLevel::Moderate
        } else {
            ImpactLevel::Low
        }
    }
}

impl Default for ImpactPolicy {
    fn default() -> Self {
        Self::V1
    }
}

/// `f64::min` would turn NaN into the cap; NaN must survive instead.
fn cap(value: f64, max: f64) -> f64 {
    if value > max {
        max
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Moderate,
    High,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Moderate => "moderate",
            ImpactLevel::High => "high",
        }
    }

    /// Localization key of the short label
    pub fn label_key(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "impact_low",
            ImpactLevel::Moderate => "impact_moderate",
            ImpactLevel::High => "impact_high",
        }
    }

    /// Localization key of the effect text template
    pub fn effect_key(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "impact_nominal",
            ImpactLevel::Moderate => "impact_noticeable",
            ImpactLevel::High => "impact_significant",
        }
    }
}

/// Impact on a single region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionImpactResult {
    pub region_key: String,
    pub display_name_key: String,
    pub display_name: String,
    pub impact_score: f64,
    pub impact_level: ImpactLevel,
    pub impact_label: String,
    pub effect_description: String,
}

/// Region results keyed by region key
pub type RegionImpactMap = BTreeMap<String, RegionImpactResult>;

/// Totals plus per-region results for one set of drinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAssessment {
    pub policy_version: u32,
    pub drink_count: usize,
    pub total_alcohol_grams: f64,
    pub overall_impact: f64,
    pub regions: RegionImpactMap,
}

/// Computes region impacts from logged drinks.
///
/// Holds no mutable state; one analyzer can serve any number of callers.
#[derive(Debug, Clone)]
pub struct ImpactAnalyzer<L> {
    regions: RegionTable,
    policy: ImpactPolicy,
    localizer: L,
}

impl<L: Localizer> ImpactAnalyzer<L> {
    pub fn new(regions: RegionTable, localizer: L) -> Self {
        Self::with_policy(regions, ImpactPolicy::V1, localizer)
    }

    pub fn with_policy(regions: RegionTable, policy: ImpactPolicy, localizer: L) -> Self {
        Self {
            regions,
            policy,
            localizer,
        }
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn policy(&self) -> &ImpactPolicy {
        &self.policy
    }

    /// Per-region impact for the given drinks
    pub fn analyze<D: AlcoholContent>(&self, drinks: &[D]) -> RegionImpactMap {
        let overall = self.policy.overall_impact(total_grams(drinks));
        self.regions_for(overall)
    }

    /// Like [`analyze`](Self::analyze), with the session totals attached
    pub fn assess<D: AlcoholContent>(&self, drinks: &[D]) -> SessionAssessment {
        let total = total_grams(drinks);
        let overall = self.policy.overall_impact(total);
        SessionAssessment {
            policy_version: self.policy.version,
            drink_count: drinks.len(),
            total_alcohol_grams: total,
            overall_impact: overall,
            regions: self.regions_for(overall),
        }
    }

    fn regions_for(&self, overall: f64) -> RegionImpactMap {
        self.regions
            .iter()
            .map(|region| (region.key.clone(), self.region_result(region, overall)))
            .collect()
    }

    fn region_result(&self, region: &BrainRegionDefinition, overall: f64) -> RegionImpactResult {
        let score = self.policy.region_impact(overall, region.sensitivity);
        let level = self.policy.classify(score);

        let effect_description = match level {
            ImpactLevel::Low => self.localizer.resolve(level.effect_key(), &[]),
            ImpactLevel::Moderate | ImpactLevel::High => {
                let functions = region.functions.to_lowercase();
                self.localizer.resolve(level.effect_key(), &[functions.as_str()])
            }
        };

        RegionImpactResult {
            region_key: region.key.clone(),
            display_name_key: region.display_name_key.clone(),
            display_name: self.localizer.resolve(&region.display_name_key, &[]),
            impact_score: score,
            impact_level: level,
            impact_label: self.localizer.resolve(level.label_key(), &[]),
            effect_description,
        }
    }
}

/// Folded from +0.0: an empty `f64` sum is -0.0
fn total_grams<D: AlcoholContent>(drinks: &[D]) -> f64 {
    drinks.iter().fold(0.0, |acc, d| acc + d.alcohol_grams())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::analysis::localizer::MessageCatalog;
    use crate::analysis::quantity::derive_alcohol_grams;

    const EPS: f64 = 1e-3;

    fn analyzer() -> ImpactAnalyzer<MessageCatalog> {
        ImpactAnalyzer::new(RegionTable::standard(), MessageCatalog::english())
    }

    /// Records every key/args pair it is asked for
    #[derive(Default)]
    struct RecordingLocalizer {
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl Localizer for RecordingLocalizer {
        fn resolve(&self, key: &str, args: &[&str]) -> String {
            self.calls
                .borrow_mut()
                .push((key.to_string(), args.iter().map(|a| a.to_string()).collect()));
            format!("{}|{}", key, args.join(","))
        }
    }

    #[test]
    fn test_empty_session_is_all_low() {
        let result = analyzer().analyze::<f64>(&[]);
        assert_eq!(result.len(), 6);
        for region in result.values() {
            assert_eq!(region.impact_score, 0.0);
            assert_eq!(region.impact_level, ImpactLevel::Low);
            assert_eq!(region.effect_description, "Nominal impact at this level.");
        }
    }

    #[test]
    fn test_empty_session_total_is_positive_zero() {
        let assessment = analyzer().assess::<f64>(&[]);
        assert!(assessment.total_alcohol_grams.is_sign_positive());
        let json = serde_json::to_string(&assessment).unwrap();
        assert!(json.contains(r#""total_alcohol_grams":0.0"#));
        assert!(!json.contains("-0.0"));
    }

    #[test]
    fn test_pint_of_beer_scenario() {
        let grams = derive_alcohol_grams(568.0, 4.5);
        let assessment = analyzer().assess(&[grams]);

        assert!((assessment.total_alcohol_grams - 20.167).abs() < EPS);
        assert!((assessment.overall_impact - 1.656).abs() < EPS);

        let frontal = &assessment.regions["frontalLobe"];
        assert!((frontal.impact_score - 1.987).abs() < EPS);
        assert_eq!(frontal.impact_level, ImpactLevel::Moderate);
        assert_eq!(
            frontal.effect_description,
            "Noticeable impairment to judgment, planning, social conduct, and speech."
        );
        assert_eq!(frontal.display_name, "Frontal Lobe");
        assert_eq!(frontal.impact_label, "Moderate");

        let occipital = &assessment.regions["occipitalLobe"];
        assert!((occipital.impact_score - 1.325).abs() < EPS);
        assert_eq!(occipital.impact_level, ImpactLevel::Low);
    }

    #[test]
    fn test_clamped_at_five() {
        let policy = ImpactPolicy::V1;
        assert_eq!(policy.overall_impact(10_000.0), 5.0);

        let result = analyzer().analyze(&[10_000.0]);
        for region in result.values() {
            assert!(region.impact_score <= 5.0);
            assert_eq!(region.impact_level, ImpactLevel::High);
            assert!(region.effect_description.starts_with("Significant disruption of "));
        }
        assert_eq!(result["brainstem"].impact_score, 5.0);
    }

    #[test]
    fn test_monotonic_in_total_grams() {
        let analyzer = analyzer();
        let totals = [0.0, 1.0, 5.0, 12.0, 20.0, 40.0, 80.0, 160.0, 500.0, 10_000.0];
        for pair in totals.windows(2) {
            let lower = analyzer.analyze(&[pair[0]]);
            let higher = analyzer.analyze(&[pair[1]]);
            for (key, region) in &lower {
                assert!(region.impact_score <= higher[key].impact_score);
            }
        }
    }

    #[test]
    fn test_sensitivity_ordering() {
        let analyzer = analyzer();
        for total in [0.5, 10.0, 30.0, 100.0, 1_000.0] {
            let result = analyzer.analyze(&[total]);
            assert!(result["brainstem"].impact_score >= result["parietalLobe"].impact_score);
            assert!(result["cerebellum"].impact_score >= result["occipitalLobe"].impact_score);
        }
    }

    #[test]
    fn test_order_independent() {
        let analyzer = analyzer();
        let a = analyzer.analyze(&[12.0, 3.5, 20.0]);
        let b = analyzer.analyze(&[20.0, 12.0, 3.5]);
        for (key, region) in &a {
            assert!((region.impact_score - b[key].impact_score).abs() < 1e-12);
            assert_eq!(region.impact_level, b[key].impact_level);
        }
    }

    #[test]
    fn test_boundaries_land_in_lower_bucket() {
        let policy = ImpactPolicy::V1;
        assert_eq!(policy.classify(1.5), ImpactLevel::Low);
        assert_eq!(policy.classify(1.5001), ImpactLevel::Moderate);
        assert_eq!(policy.classify(3.5), ImpactLevel::Moderate);
        assert_eq!(policy.classify(3.5001), ImpactLevel::High);
    }

    #[test]
    fn test_non_positive_total_is_zero() {
        let policy = ImpactPolicy::V1;
        assert_eq!(policy.overall_impact(0.0), 0.0);
        assert_eq!(policy.overall_impact(-25.0), 0.0);
        let result = analyzer().analyze(&[-25.0]);
        assert!(result.values().all(|r| r.impact_score == 0.0));
    }

    #[test]
    fn test_small_totals_keep_precision() {
        let overall = ImpactPolicy::V1.overall_impact(1e-12);
        assert!(overall > 0.0);
        assert!((overall - 1.5e-13).abs() < 1e-20);
    }

    #[test]
    fn test_nan_propagates() {
        let result = analyzer().analyze(&[f64::NAN]);
        for region in result.values() {
            assert!(region.impact_score.is_nan());
            assert_eq!(region.impact_level, ImpactLevel::Low);
        }
    }

    #[test]
    fn test_localizer_receives_expected_keys() {
        let localizer = RecordingLocalizer::default();
        let analyzer = ImpactAnalyzer::new(RegionTable::standard(), &localizer);

        // 40g: overall ≈ 2.41, cerebellum 3.62 (High), temporal 2.41 (Moderate), occipital 1.93 (Moderate)
        let result = analyzer.analyze(&[40.0]);
        assert_eq!(
            result["cerebellum"].effect_description,
            "impact_significant|coordination, balance, and motor control."
        );
        assert_eq!(
            result["temporalLobe"].effect_description,
            "impact_noticeable|auditory processing and language comprehension."
        );

        let calls = localizer.calls.borrow();
        assert!(calls.iter().any(|(k, a)| k == "region_brainstem" && a.is_empty()));
        assert!(calls
            .iter()
            .filter(|(k, _)| k.starts_with("impact_no") || k == "impact_significant")
            .all(|(k, a)| (k == "impact_nominal") == a.is_empty()));
    }

    #[test]
    fn test_custom_region_table() {
        let table = RegionTable::new(vec![BrainRegionDefinition::new("hippocampus", "Memory formation.", 3.0)]);
        let analyzer = ImpactAnalyzer::new(table, MessageCatalog::english());
        let result = analyzer.analyze(&[20.0]);
        assert_eq!(result.len(), 1);
        let region = &result["hippocampus"];
        assert_eq!(region.display_name, "region_hippocampus");
        assert_eq!(region.impact_level, ImpactLevel::High);
        assert_eq!(region.effect_description, "Significant disruption of memory formation.");
    }

    #[test]
    fn test_idempotent_serialization() {
        let analyzer = analyzer();
        let drinks = [derive_alcohol_grams(175.0, 13.0), derive_alcohol_grams(25.0, 40.0)];
        let first = serde_json::to_string(&analyzer.assess(&drinks)).unwrap();
        let second = serde_json::to_string(&analyzer.assess(&drinks)).unwrap();
        assert_eq!(first, second);
    }
}
