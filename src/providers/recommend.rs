//! Meal recommendation provider
//!
//! Generates personalized meal plans from a health profile and dietary
//! preferences via the Gemini text API, and refines a single meal from
//! user feedback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::{HealthProfile, MealPreferences};

use super::gemini::{strip_code_fences, GeminiClient, GenerationConfig, Part, ProviderError};

/// One recommended meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    /// Breakfast / Lunch / Dinner (absent for refined meals)
    #[serde(default)]
    pub meal_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub preparation: String,
    /// Estimated carbs, as the model words it (e.g. "30g")
    #[serde(default)]
    pub carbs: String,
    #[serde(default)]
    pub glycemic_load: String,
    #[serde(default)]
    pub diabetes_friendly_tips: String,
}

/// A lower-carb swap for a common dish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealAlternative {
    pub high_carb_dish: String,
    pub healthy_alternative: String,
    #[serde(default)]
    pub benefit: String,
}

/// Full recommendation set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecommendations {
    #[serde(default)]
    pub meal_plans: Vec<MealPlan>,
    #[serde(default)]
    pub alternatives: Vec<MealAlternative>,
    #[serde(default)]
    pub general_tips: Vec<String>,
}

/// A meal improved from user feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinedMeal {
    pub improved_meal: MealPlan,
    #[serde(default)]
    pub explanation: String,
}

/// Narrow contract for the text-generation collaborator
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn meal_recommendations(
        &self,
        profile: &HealthProfile,
        preferences: &MealPreferences,
    ) -> Result<MealRecommendations, ProviderError>;

    async fn refine_meal(
        &self,
        meal_name: &str,
        feedback: &str,
    ) -> Result<RefinedMeal, ProviderError>;
}

/// Gemini-backed recommendation provider
pub struct GeminiRecommendationProvider {
    client: GeminiClient,
}

impl GeminiRecommendationProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: GeminiClient::new(config),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }
}

#[async_trait]
impl RecommendationProvider for GeminiRecommendationProvider {
    async fn meal_recommendations(
        &self,
        profile: &HealthProfile,
        preferences: &MealPreferences,
    ) -> Result<MealRecommendations, ProviderError> {
        let prompt = recommendation_prompt(profile, preferences);
        let text = self
            .client
            .generate(vec![Part::text(prompt)], GenerationConfig::recommendation())
            .await?;
        parse_payload(&text)
    }

    async fn refine_meal(
        &self,
        meal_name: &str,
        feedback: &str,
    ) -> Result<RefinedMeal, ProviderError> {
        let prompt = refine_prompt(meal_name, feedback);
        let text = self
            .client
            .generate(vec![Part::text(prompt)], GenerationConfig::recommendation())
            .await?;
        parse_payload(&text)
    }
}

/// Strictly decode a JSON payload from model text
///
/// One outer markdown fence is stripped; any remaining parse failure is a
/// tagged error, rendered by the tool layer as a structured error payload.
fn parse_payload<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    let payload = strip_code_fences(text);
    serde_json::from_str(payload).map_err(|e| ProviderError::Parse(e.to_string()))
}

fn recommendation_prompt(profile: &HealthProfile, preferences: &MealPreferences) -> String {
    format!(
        r#"You are a diabetes nutrition specialist AI. Create personalized meal recommendations for a user with the following health profile and preferences:

HEALTH PROFILE:
{}

USER PREFERENCES:
{}

Please provide the following in JSON format:
1. Three meal plans (breakfast, lunch, dinner) with low glycemic index options
2. For each meal, provide a healthier alternative to a common high-carb dish
3. Include estimated carbohydrate content and glycemic load for each meal
4. Add specific tips for managing blood sugar with these meals

Format your response as valid JSON with these keys:
{{
    "meal_plans": [
        {{
            "meal_type": "Breakfast/Lunch/Dinner",
            "name": "meal name",
            "description": "brief description",
            "ingredients": ["ingredient1", "ingredient2"],
            "preparation": "brief preparation steps",
            "carbs": "estimated carbs in grams",
            "glycemic_load": "low/medium/high",
            "diabetes_friendly_tips": "specific tip for this meal"
        }}
    ],
    "alternatives": [
        {{
            "high_carb_dish": "common high carb dish",
            "healthy_alternative": "healthier alternative",
            "benefit": "why it's better for diabetes management"
        }}
    ],
    "general_tips": ["tip1", "tip2", "tip3"]
}}

IMPORTANT: Ensure all recommendations are evidence-based and appropriate for diabetes management.
Focus on low glycemic index foods, balanced macronutrients, and portion control.
Consider the user's specific preferences and restrictions.
Only respond with the JSON, nothing else."#,
        profile.prompt_block(),
        preferences.prompt_block(),
    )
}

fn refine_prompt(meal_name: &str, feedback: &str) -> String {
    format!(
        r#"You are a diabetes nutrition specialist AI. A user has provided feedback on a meal recommendation.
Please improve the meal based on their feedback.

ORIGINAL MEAL: {meal_name}

USER FEEDBACK: {feedback}

Please provide an improved meal recommendation in JSON format:
{{
    "improved_meal": {{
        "name": "improved meal name",
        "description": "brief description",
        "ingredients": ["ingredient1", "ingredient2"],
        "preparation": "brief preparation steps",
        "carbs": "estimated carbs in grams",
        "glycemic_load": "low/medium/high",
        "diabetes_friendly_tips": "specific tip for this meal"
    }},
    "explanation": "explanation of how the meal was improved based on feedback"
}}

IMPORTANT: Ensure all recommendations are evidence-based and appropriate for diabetes management.
Focus on addressing the specific feedback while maintaining nutritional quality.
Only respond with the JSON, nothing else."#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recommendations() {
        let recommendations: MealRecommendations = parse_payload(
            r#"{
                "meal_plans": [{
                    "meal_type": "Breakfast",
                    "name": "Greek yogurt bowl",
                    "description": "Yogurt with nuts and berries",
                    "ingredients": ["greek yogurt", "walnuts", "blueberries"],
                    "preparation": "Combine in a bowl",
                    "carbs": "18g",
                    "glycemic_load": "low",
                    "diabetes_friendly_tips": "Choose unsweetened yogurt"
                }],
                "alternatives": [{
                    "high_carb_dish": "white rice",
                    "healthy_alternative": "cauliflower rice",
                    "benefit": "far fewer carbohydrates"
                }],
                "general_tips": ["distribute carbs across the day"]
            }"#,
        )
        .unwrap();

        assert_eq!(recommendations.meal_plans.len(), 1);
        assert_eq!(recommendations.meal_plans[0].name, "Greek yogurt bowl");
        assert_eq!(recommendations.alternatives[0].healthy_alternative, "cauliflower rice");
        assert_eq!(recommendations.general_tips.len(), 1);
    }

    #[test]
    fn test_parse_fenced_refined_meal() {
        let refined: RefinedMeal = parse_payload(
            "```json\n{\"improved_meal\": {\"name\": \"Lentil soup\"}, \"explanation\": \"swapped pasta for lentils\"}\n```",
        )
        .unwrap();
        assert_eq!(refined.improved_meal.name, "Lentil soup");
        assert!(refined.improved_meal.meal_type.is_none());
    }

    #[test]
    fn test_parse_failure_is_tagged() {
        let result: Result<MealRecommendations, _> =
            parse_payload("Here are some meal ideas for you!");
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_prompt_embeds_profile_and_preferences() {
        let profile = HealthProfile {
            diabetes_risk: Some("High".to_string()),
            glucose: Some(145.0),
            bmi: Some(31.2),
            age: Some(52.0),
            insulin: Some(120.0),
        };
        let preferences = MealPreferences {
            dietary_restrictions: Some("vegetarian".to_string()),
            ..Default::default()
        };
        let prompt = recommendation_prompt(&profile, &preferences);
        assert!(prompt.contains("Diabetes Risk: High"));
        assert!(prompt.contains("Blood Glucose Level: 145 mg/dL"));
        assert!(prompt.contains("Dietary Restrictions: vegetarian"));
        assert!(prompt.contains("Cuisine Preferences: Any"));
    }
}
