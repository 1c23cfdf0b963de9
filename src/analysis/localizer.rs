//! Localization capability
//!
//! The analyzer never looks up user-facing text itself; it asks an injected
//! [`Localizer`]. [`MessageCatalog`] is the built-in implementation.

use std::collections::HashMap;

/// Resolves a message key plus positional arguments into display text
pub trait Localizer {
    fn resolve(&self, key: &str, args: &[&str]) -> String;
}

impl<L: Localizer + ?Sized> Localizer for &L {
    fn resolve(&self, key: &str, args: &[&str]) -> String {
        (**self).resolve(key, args)
    }
}

pub const DEFAULT_LANGUAGE: &str = "en";

const EN_MESSAGES: &[(&str, &str)] = &[
    ("impact_low", "Low"),
    ("impact_moderate", "Moderate"),
    ("impact_high", "High"),
    ("impact_nominal", "Nominal impact at this level."),
    ("impact_noticeable", "Noticeable impairment to {}"),
    ("impact_significant", "Significant disruption of {}"),
    ("region_frontalLobe", "Frontal Lobe"),
    ("region_temporalLobe", "Temporal Lobe"),
    ("region_parietalLobe", "Parietal Lobe"),
    ("region_occipitalLobe", "Occipital Lobe"),
    ("region_cerebellum", "Cerebellum"),
    ("region_brainstem", "Brainstem"),
    ("achievement_first_log_name", "First Sip"),
    ("achievement_first_log_desc", "Logged your first drink!"),
    ("achievement_10_drinks_name", "Social Drinker"),
    ("achievement_10_drinks_desc", "Logged 10 drinks!"),
    ("achievement_50_drinks_name", "Regular Logger"),
    ("achievement_50_drinks_desc", "50 drinks logged!"),
    ("achievement_100_drinks_name", "Dedicated Tracker"),
    ("achievement_100_drinks_desc", "100 drinks logged!"),
    ("achievement_7_day_streak_name", "7-Day Streak"),
    ("achievement_7_day_streak_desc", "Logged drinks for 7 consecutive days!"),
    ("achievement_30_day_streak_name", "30-Day Streak"),
    ("achievement_30_day_streak_desc", "Logged drinks for 30 consecutive days!"),
    ("achievement_5_goal_name", "Goal Setter Novice"),
    ("achievement_5_goal_desc", "Hit your daily goal 5 times!"),
];

/// In-memory message templates keyed by language.
///
/// Templates use `{}` placeholders filled left to right. Lookups fall back to
/// English, then to the key itself.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    language: String,
    messages: HashMap<String, HashMap<&'static str, &'static str>>,
}

impl MessageCatalog {
    /// Catalog with the built-in English messages, resolving in `language`
    pub fn new(language: &str) -> Self {
        let mut messages = HashMap::new();
        messages.insert(
            DEFAULT_LANGUAGE.to_string(),
            EN_MESSAGES.iter().copied().collect(),
        );
        Self {
            language: language.to_lowercase(),
            messages,
        }
    }

    pub fn english() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }

    /// Register templates for another language
    pub fn with_language(
        mut self,
        language: &str,
        entries: &[(&'static str, &'static str)],
    ) -> Self {
        self.messages
            .entry(language.to_lowercase())
            .or_default()
            .extend(entries.iter().copied());
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn supports(&self, language: &str) -> bool {
        self.messages.contains_key(&language.to_lowercase())
    }

    fn template(&self, key: &str) -> Option<&'static str> {
        self.messages
            .get(&self.language)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANGUAGE).and_then(|m| m.get(key)))
            .copied()
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer for MessageCatalog {
    fn resolve(&self, key: &str, args: &[&str]) -> String {
        match self.template(key) {
            Some(template) => fill_template(template, args),
            None => key.to_string(),
        }
    }
}

/// Replace each `{}` with the next argument; surplus placeholders stay empty
fn fill_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        if let Some(arg) = args.next() {
            out.push_str(arg);
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
