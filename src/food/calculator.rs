//! Nutrition scaling
//!
//! Scales per-100g records to an estimated portion, and hosts the
//! caller-side GI override policy.

use crate::models::{GiLevel, GiSource, NutritionFacts, NutritionRecord};

/// Match scores below this let an AI carb estimate override the database GI
pub const GI_OVERRIDE_SCORE_THRESHOLD: f64 = 0.7;

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scale a per-100g record to a portion mass
///
/// Every numeric output is `field * portion_grams / 100` rounded to one
/// decimal; the GI category passes through unchanged.
pub fn scale_to_portion(record: &NutritionRecord, portion_grams: f64) -> NutritionFacts {
    let factor = portion_grams / 100.0;
    NutritionFacts {
        calories: round1(record.calories * factor),
        carbs: round1(record.carbs * factor),
        protein: round1(record.protein * factor),
        fat: round1(record.fat * factor),
        fiber: round1(record.fiber * factor),
        gi: record.gi,
        gi_source: GiSource::Database,
    }
}

/// GI override policy
///
/// When the database match is low-confidence and the vision provider
/// supplied an independent carb estimate, trust the per-image estimate
/// over the weakly matched table entry. Applied by the analysis pipeline,
/// never inside `scale_to_portion`.
pub fn apply_gi_override(
    facts: &mut NutritionFacts,
    match_score: f64,
    ai_carb_tier: Option<GiLevel>,
) {
    if match_score < GI_OVERRIDE_SCORE_THRESHOLD {
        if let Some(tier) = ai_carb_tier {
            facts.gi = tier;
            facts.gi_source = GiSource::AiEstimate;
        }
    }
}
