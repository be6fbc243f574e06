//! Vision label provider
//!
//! Identifies the food in a photo via the Gemini vision API and decodes
//! the model's answer into a structured observation.

use async_trait::async_trait;

use crate::config::Config;
use crate::models::FoodObservation;

use super::gemini::{strip_code_fences, GeminiClient, GenerationConfig, Part, ProviderError};

/// Instruction prompt for food identification
const FOOD_ID_PROMPT: &str = r#"
You are a food recognition AI specialized in identifying food items for diabetes management.

Analyze this image and identify the food item shown.

Please provide the following information in JSON format:
1. The name of the food (be specific)
2. Confidence level (high, medium, or low)
3. Whether it's a single food item or a meal with multiple components
4. If it's a meal, list the main components
5. Estimated carbohydrate content (high, medium, or low)

Format your response as valid JSON with these keys:
{
    "food_name": "specific food name",
    "confidence": "high/medium/low",
    "is_meal": true/false,
    "components": ["component1", "component2"] (if applicable),
    "carb_content": "high/medium/low"
}

Only respond with the JSON, nothing else. This is critical for a diabetes management application.
"#;

/// Narrow contract for the image -> observation collaborator
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Identify the food in a base64-encoded JPEG
    async fn analyze_food_image(&self, jpeg_base64: &str) -> Result<FoodObservation, ProviderError>;
}

/// Gemini-backed vision provider
pub struct GeminiVisionProvider {
    client: GeminiClient,
}

impl GeminiVisionProvider {
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
impl VisionProvider for GeminiVisionProvider {
    async fn analyze_food_image(&self, jpeg_base64: &str) -> Result<FoodObservation, ProviderError> {
        let parts = vec![Part::text(FOOD_ID_PROMPT), Part::jpeg_base64(jpeg_base64)];
        let text = self.client.generate(parts, GenerationConfig::vision()).await?;
        parse_observation(&text)
    }
}

/// Strictly decode the model's text as a food observation
///
/// One outer markdown fence is stripped first; anything that then fails
/// to parse as the requested JSON object is a tagged parse error, which
/// callers degrade to a default observation.
pub fn parse_observation(text: &str) -> Result<FoodObservation, ProviderError> {
    let payload = strip_code_fences(text);
    serde_json::from_str(payload).map_err(|e| ProviderError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceTier, GiLevel};

    #[test]
    fn test_parse_full_observation() {
        let obs = parse_observation(
            r#"{
                "food_name": "margherita pizza",
                "confidence": "high",
                "is_meal": false,
                "components": [],
                "carb_content": "high"
            }"#,
        )
        .unwrap();
        assert_eq!(obs.food_name, "margherita pizza");
        assert_eq!(obs.confidence, ConfidenceTier::High);
        assert_eq!(obs.carb_content, Some(GiLevel::High));
    }

    #[test]
    fn test_parse_fenced_observation() {
        let obs = parse_observation(
            "```json\n{\"food_name\": \"salad\", \"confidence\": \"medium\", \"is_meal\": true, \"components\": [\"lettuce\", \"tomato\"]}\n```",
        )
        .unwrap();
        assert_eq!(obs.food_name, "salad");
        assert!(obs.is_meal);
        assert_eq!(obs.components, vec!["lettuce", "tomato"]);
        assert_eq!(obs.carb_content, None);
    }

    #[test]
    fn test_parse_rejects_prose() {
        let result = parse_observation("This looks like a delicious pizza to me!");
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_confidence() {
        let result = parse_observation(
            r#"{"food_name": "pizza", "confidence": "absolutely certain"}"#,
        );
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }
}
