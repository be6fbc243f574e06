//! Meal recommendation tools
//!
//! Renders provider results, absorbing failures into structured error
//! payloads instead of raw errors.

use serde::Serialize;

use crate::providers::{MealRecommendations, ProviderError, RefinedMeal};

use super::ErrorResponse;

/// Either the recommendations or a structured error payload
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecommendationOutcome {
    Recommendations(MealRecommendations),
    Error(ErrorResponse),
}

/// Either the refined meal or a structured error payload
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RefinementOutcome {
    Refined(RefinedMeal),
    Error(ErrorResponse),
}

/// Absorb a provider failure into an error payload
///
/// Parse and HTTP failures never surface as raw errors to the caller.
pub fn render_recommendations(
    result: Result<MealRecommendations, ProviderError>,
) -> RecommendationOutcome {
    match result {
        Ok(recommendations) => RecommendationOutcome::Recommendations(recommendations),
        Err(error) => {
            tracing::warn!("meal recommendation call failed: {}", error);
            RecommendationOutcome::Error(ErrorResponse::new(error.to_string()))
        }
    }
}

pub fn render_refinement(result: Result<RefinedMeal, ProviderError>) -> RefinementOutcome {
    match result {
        Ok(refined) => RefinementOutcome::Refined(refined),
        Err(error) => {
            tracing::warn!("meal refinement call failed: {}", error);
            RefinementOutcome::Error(ErrorResponse::new(error.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_becomes_error_payload() {
        let outcome = render_recommendations(Err(ProviderError::Parse(
            "expected value at line 1".to_string(),
        )));
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("failed to parse model output"));
    }

    #[test]
    fn test_success_serializes_recommendations() {
        let outcome = render_recommendations(Ok(MealRecommendations {
            meal_plans: Vec::new(),
            alternatives: Vec::new(),
            general_tips: vec!["pair carbs with protein".to_string()],
        }));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["general_tips"][0], "pair carbs with protein");
        assert!(json.get("error").is_none());
    }
}
