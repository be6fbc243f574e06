//! Food analysis tools
//!
//! Response structs and assembly for photo analysis, label matching, and
//! table lookups.

use image::DynamicImage;
use serde::Serialize;

use crate::food::{
    analyze_observation, match_food, scale_to_portion, FoodTable, MealAnalysis, PortionEstimator,
};
use crate::models::{FoodObservation, GiLevel, GiSource, NutritionFacts};

/// Glycemic index block shared by several responses
#[derive(Debug, Serialize)]
pub struct GiInfo {
    pub level: GiLevel,
    pub description: &'static str,
    pub diabetes_tip: &'static str,
    pub source: GiSource,
}

impl GiInfo {
    fn from_facts(facts: &NutritionFacts) -> Self {
        Self {
            level: facts.gi,
            description: facts.gi.description(),
            diabetes_tip: facts.gi.diabetes_tip(),
            source: facts.gi_source,
        }
    }
}

/// Response for analyze_meal_photo
#[derive(Debug, Serialize)]
pub struct AnalyzeFoodResponse {
    /// Raw label from the vision provider
    pub identified_food: String,
    /// Provider confidence tier and its numeric display value
    pub ai_confidence: String,
    pub ai_confidence_score: f64,
    pub is_meal: bool,
    pub components: Vec<String>,
    /// Independent AI carb estimate, when supplied
    pub ai_carb_estimate: Option<GiLevel>,
    /// Matched table entry and match quality
    pub matched_food: String,
    pub match_score: f64,
    pub portion_grams: f64,
    pub nutrition: NutritionFacts,
    pub gi: GiInfo,
    /// Set when the vision provider failed and a placeholder observation
    /// was analyzed instead
    pub provider_warning: Option<String>,
}

/// Assemble the analysis response from an observation
///
/// `provider_warning` carries the degradation reason when the vision call
/// failed; the pipeline still runs on the placeholder observation so the
/// result stays complete and renderable.
pub fn build_analysis(
    observation: &FoodObservation,
    provider_warning: Option<String>,
    image: Option<&DynamicImage>,
    table: &FoodTable,
    estimator: &dyn PortionEstimator,
) -> Result<AnalyzeFoodResponse, String> {
    build_analysis_with_record(observation, provider_warning, image, table, estimator)
        .map(|(response, _)| response)
}

fn respond(
    analysis: MealAnalysis,
    observation: &FoodObservation,
    provider_warning: Option<String>,
) -> AnalyzeFoodResponse {
    AnalyzeFoodResponse {
        identified_food: analysis.identified_food.clone(),
        ai_confidence: analysis.ai_confidence.as_str().to_string(),
        ai_confidence_score: analysis.ai_confidence.as_score(),
        is_meal: analysis.is_meal,
        components: analysis.components.clone(),
        ai_carb_estimate: observation.carb_content,
        matched_food: analysis.matched_food.clone(),
        match_score: analysis.match_score,
        portion_grams: analysis.portion_grams,
        gi: GiInfo::from_facts(&analysis.nutrition),
        nutrition: analysis.nutrition.clone(),
        provider_warning,
    }
}

/// Build the response and hand back the analysis for session storage
pub fn build_analysis_with_record(
    observation: &FoodObservation,
    provider_warning: Option<String>,
    image: Option<&DynamicImage>,
    table: &FoodTable,
    estimator: &dyn PortionEstimator,
) -> Result<(AnalyzeFoodResponse, MealAnalysis), String> {
    let analysis = analyze_observation(observation, table, estimator, image)
        .ok_or_else(|| "nutrition table is empty".to_string())?;
    let response = respond(analysis.clone(), observation, provider_warning);
    Ok((response, analysis))
}

/// Response for identify_food
#[derive(Debug, Serialize)]
pub struct IdentifyFoodResponse {
    pub label: String,
    pub matched_food: String,
    pub match_score: f64,
    /// Standard portion used for the nutrition figures
    pub portion_grams: f64,
    pub nutrition: NutritionFacts,
    pub gi: GiInfo,
}

/// Match a free-text label and report nutrition at the standard portion
pub fn identify_food(label: &str, table: &FoodTable) -> Result<IdentifyFoodResponse, String> {
    let matched = match_food(label, table).ok_or_else(|| "nutrition table is empty".to_string())?;
    let record = table
        .get(&matched.key)
        .ok_or_else(|| format!("matched food '{}' missing from table", matched.key))?;

    let portion_grams = table
        .standard_portion(&matched.key)
        .unwrap_or(crate::food::DEFAULT_PORTION_G);
    let nutrition = scale_to_portion(record, portion_grams);

    Ok(IdentifyFoodResponse {
        label: label.to_string(),
        matched_food: matched.key,
        match_score: matched.score,
        portion_grams,
        gi: GiInfo::from_facts(&nutrition),
        nutrition,
    })
}

/// Response for get_food_info
#[derive(Debug, Serialize)]
pub struct FoodInfoResponse {
    pub name: String,
    /// Per-100g values
    pub carbs: f64,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub gi: GiLevel,
    pub gi_description: &'static str,
    pub diabetes_tip: &'static str,
    pub standard_portion_grams: Option<f64>,
}

/// Look up one table entry by canonical name
pub fn get_food_info(name: &str, table: &FoodTable) -> Option<FoodInfoResponse> {
    let record = table.get(name)?;
    Some(FoodInfoResponse {
        name: record.name.clone(),
        carbs: record.carbs,
        calories: record.calories,
        protein: record.protein,
        fat: record.fat,
        fiber: record.fiber,
        gi: record.gi,
        gi_description: record.gi.description(),
        diabetes_tip: record.gi.diabetes_tip(),
        standard_portion_grams: table.standard_portion(&record.name),
    })
}

/// Summary row for list_foods
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub name: String,
    pub carbs: f64,
    pub calories: f64,
    pub gi: GiLevel,
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: usize,
}

/// List the whole table in insertion order
pub fn list_foods(table: &FoodTable) -> ListFoodsResponse {
    let foods: Vec<FoodSummary> = table
        .records()
        .iter()
        .map(|record| FoodSummary {
            name: record.name.clone(),
            carbs: record.carbs,
            calories: record.calories,
            gi: record.gi,
        })
        .collect();
    ListFoodsResponse {
        total: foods.len(),
        foods,
    }
}

/// Response for estimate_nutrition
#[derive(Debug, Serialize)]
pub struct EstimateNutritionResponse {
    pub label: String,
    pub matched_food: String,
    pub match_score: f64,
    pub portion_grams: f64,
    pub nutrition: NutritionFacts,
    pub gi: GiInfo,
}

/// Scale a (possibly fuzzy) food's nutrition to an explicit portion
pub fn estimate_nutrition(
    label: &str,
    portion_grams: f64,
    table: &FoodTable,
) -> Result<EstimateNutritionResponse, String> {
    if portion_grams < 0.0 {
        return Err("portion_grams must be non-negative".to_string());
    }
    let matched = match_food(label, table).ok_or_else(|| "nutrition table is empty".to_string())?;
    let record = table
        .get(&matched.key)
        .ok_or_else(|| format!("matched food '{}' missing from table", matched.key))?;
    let nutrition = scale_to_portion(record, portion_grams);

    Ok(EstimateNutritionResponse {
        label: label.to_string(),
        matched_food: matched.key,
        match_score: matched.score,
        portion_grams,
        gi: GiInfo::from_facts(&nutrition),
        nutrition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::ReferencePortionEstimator;
    use crate::models::ConfidenceTier;

    #[test]
    fn test_degraded_analysis_is_complete() {
        let table = FoodTable::builtin();
        let estimator = ReferencePortionEstimator::with_seed(3);
        let observation = FoodObservation::degraded("unknown");

        let response = build_analysis(
            &observation,
            Some("API error: 500 - boom".to_string()),
            None,
            &table,
            &estimator,
        )
        .unwrap();

        assert_eq!(response.ai_confidence, "low");
        assert!(table.contains(&response.matched_food));
        assert!(response.provider_warning.is_some());
        assert!(response.portion_grams > 0.0);
    }

    #[test]
    fn test_identify_food_uses_standard_portion() {
        let table = FoodTable::builtin();
        let response = identify_food("a fresh banana", &table).unwrap();
        assert_eq!(response.matched_food, "banana");
        assert_eq!(response.match_score, 0.9);
        assert_eq!(response.portion_grams, 120.0);
        // 23 * 1.2 = 27.6
        assert_eq!(response.nutrition.carbs, 27.6);
    }

    #[test]
    fn test_estimate_nutrition_scales_explicit_portion() {
        let table = FoodTable::builtin();
        let response = estimate_nutrition("apple", 150.0, &table).unwrap();
        assert_eq!(response.nutrition.carbs, 21.0);
        assert_eq!(response.nutrition.calories, 78.0);
        assert!(estimate_nutrition("apple", -1.0, &table).is_err());
    }

    #[test]
    fn test_get_food_info() {
        let table = FoodTable::builtin();
        let info = get_food_info("Cheese", &table).unwrap();
        assert_eq!(info.name, "cheese");
        assert_eq!(info.standard_portion_grams, Some(30.0));
        assert!(get_food_info("sushi", &table).is_none());
    }

    #[test]
    fn test_list_foods_in_table_order() {
        let table = FoodTable::builtin();
        let response = list_foods(&table);
        assert_eq!(response.total, 20);
        assert_eq!(response.foods[0].name, "apple");
        assert_eq!(response.foods[19].name, "ice cream");
    }

    #[test]
    fn test_analysis_with_record_returns_same_data() {
        let table = FoodTable::builtin();
        let estimator = ReferencePortionEstimator::with_seed(3);
        let observation = FoodObservation {
            food_name: "pasta".to_string(),
            confidence: ConfidenceTier::High,
            is_meal: false,
            components: Vec::new(),
            carb_content: None,
        };
        let (response, analysis) =
            build_analysis_with_record(&observation, None, None, &table, &estimator).unwrap();
        assert_eq!(response.matched_food, analysis.matched_food);
        assert_eq!(response.portion_grams, analysis.portion_grams);
    }
}
