//! Meal analysis pipeline
//!
//! Composes the matcher, portion estimator, and calculator into one
//! analysis of a vision observation.

use image::DynamicImage;
use serde::Serialize;

use crate::models::{ConfidenceTier, FoodObservation, NutritionFacts};

use super::calculator::{apply_gi_override, scale_to_portion};
use super::matcher::match_food;
use super::portion::PortionEstimator;
use super::table::FoodTable;

/// One complete analysis of a food observation
#[derive(Debug, Clone, Serialize)]
pub struct MealAnalysis {
    /// Raw label from the vision provider
    pub identified_food: String,
    /// Provider confidence tier
    pub ai_confidence: ConfidenceTier,
    pub is_meal: bool,
    pub components: Vec<String>,
    /// Canonical table entry the label matched
    pub matched_food: String,
    /// Match quality in [0, 1]
    pub match_score: f64,
    /// Estimated portion mass in grams
    pub portion_grams: f64,
    /// Portion-scaled nutrition, with GI override applied
    pub nutrition: NutritionFacts,
}

/// Run the full matching and nutrition pipeline for one observation
///
/// Always produces a complete result for a non-empty table, whatever the
/// label looks like; returns None only when the table is empty.
pub fn analyze_observation(
    observation: &FoodObservation,
    table: &FoodTable,
    estimator: &dyn PortionEstimator,
    image: Option<&DynamicImage>,
) -> Option<MealAnalysis> {
    let matched = match_food(&observation.food_name, table)?;

    // Matcher invariant: the key is present in the table
    let record = table.get(&matched.key)?;

    let portion_grams = estimator.estimate(image, &matched.key, table);
    let mut nutrition = scale_to_portion(record, portion_grams);
    apply_gi_override(&mut nutrition, matched.score, observation.carb_content);

    Some(MealAnalysis {
        identified_food: observation.food_name.clone(),
        ai_confidence: observation.confidence,
        is_meal: observation.is_meal,
        components: observation.components.clone(),
        matched_food: matched.key,
        match_score: matched.score,
        portion_grams,
        nutrition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::portion::ReferencePortionEstimator;
    use crate::models::{GiLevel, GiSource};

    fn observation(label: &str) -> FoodObservation {
        FoodObservation {
            food_name: label.to_string(),
            confidence: ConfidenceTier::High,
            is_meal: false,
            components: Vec::new(),
            carb_content: None,
        }
    }

    #[test]
    fn test_pipeline_produces_complete_result() {
        let table = FoodTable::builtin();
        let estimator = ReferencePortionEstimator::with_seed(7);

        let analysis =
            analyze_observation(&observation("vegetable salad"), &table, &estimator, None)
                .unwrap();

        assert_eq!(analysis.matched_food, "salad");
        assert_eq!(analysis.match_score, 0.9);
        assert!(analysis.portion_grams > 0.0);
        assert_eq!(analysis.nutrition.gi, GiLevel::Low);
        assert_eq!(analysis.nutrition.gi_source, GiSource::Database);
    }

    #[test]
    fn test_degraded_observation_still_analyzes() {
        let table = FoodTable::builtin();
        let estimator = ReferencePortionEstimator::with_seed(7);

        let obs = FoodObservation::degraded("unknown");
        let analysis = analyze_observation(&obs, &table, &estimator, None).unwrap();

        assert!(table.contains(&analysis.matched_food));
        assert_eq!(analysis.ai_confidence, ConfidenceTier::Low);
        assert!(analysis.nutrition.calories >= 0.0);
    }

    #[test]
    fn test_low_confidence_match_takes_ai_carb_tier() {
        let table = FoodTable::builtin();
        let estimator = ReferencePortionEstimator::with_seed(7);

        let mut obs = observation("mystery dish casserole");
        obs.carb_content = Some(GiLevel::High);
        let analysis = analyze_observation(&obs, &table, &estimator, None).unwrap();

        // Generic fallback scores 0.5, below the override threshold
        assert!(analysis.match_score < 0.7);
        assert_eq!(analysis.nutrition.gi, GiLevel::High);
        assert_eq!(analysis.nutrition.gi_source, GiSource::AiEstimate);
    }

    #[test]
    fn test_confident_match_keeps_database_gi() {
        let table = FoodTable::builtin();
        let estimator = ReferencePortionEstimator::with_seed(7);

        let mut obs = observation("apple");
        obs.carb_content = Some(GiLevel::High);
        let analysis = analyze_observation(&obs, &table, &estimator, None).unwrap();

        assert_eq!(analysis.match_score, 1.0);
        assert_eq!(analysis.nutrition.gi, GiLevel::Low);
        assert_eq!(analysis.nutrition.gi_source, GiSource::Database);
    }
}
