//! Vision observation types
//!
//! The structured record a vision provider produces for one food photo,
//! and the matcher's verdict about it.

use serde::{Deserialize, Serialize};

use super::GiLevel;

/// Coarse confidence tier reported by the vision provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    #[default]
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }

    /// Numeric confidence used for display (mirrors the tier midpoints)
    pub fn as_score(&self) -> f64 {
        match self {
            ConfidenceTier::High => 0.9,
            ConfidenceTier::Medium => 0.7,
            ConfidenceTier::Low => 0.5,
        }
    }
}

/// One analysis result from the vision provider
///
/// Transient: created per analyze request and discarded after display
/// unless the user saves the derived meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodObservation {
    /// Raw free-text label, e.g. "grilled chicken breast with rice"
    pub food_name: String,
    #[serde(default)]
    pub confidence: ConfidenceTier,
    /// Whether the image shows a multi-component meal
    #[serde(default)]
    pub is_meal: bool,
    /// Component labels, in the provider's order
    #[serde(default)]
    pub components: Vec<String>,
    /// Independent AI carbohydrate estimate, when the provider supplies one
    #[serde(default)]
    pub carb_content: Option<GiLevel>,
}

impl FoodObservation {
    /// Placeholder observation substituted when the provider fails
    ///
    /// Downstream stages still run so the caller always gets a complete,
    /// renderable result.
    pub fn degraded(food_name: &str) -> Self {
        Self {
            food_name: food_name.to_string(),
            confidence: ConfidenceTier::Low,
            is_meal: false,
            components: Vec::new(),
            carb_content: None,
        }
    }
}

/// The matcher's verdict: a canonical table key plus a match score in [0, 1]
///
/// Invariant: `key` always names an entry present in the table the match
/// ran against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub key: String,
    pub score: f64,
}

impl MatchResult {
    pub fn new(key: impl Into<String>, score: f64) -> Self {
        Self {
            key: key.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_scores() {
        assert_eq!(ConfidenceTier::High.as_score(), 0.9);
        assert_eq!(ConfidenceTier::Medium.as_score(), 0.7);
        assert_eq!(ConfidenceTier::Low.as_score(), 0.5);
    }

    #[test]
    fn test_degraded_observation() {
        let obs = FoodObservation::degraded("unknown");
        assert_eq!(obs.food_name, "unknown");
        assert_eq!(obs.confidence, ConfidenceTier::Low);
        assert!(!obs.is_meal);
        assert!(obs.components.is_empty());
        assert!(obs.carb_content.is_none());
    }

    #[test]
    fn test_observation_deserializes_with_defaults() {
        let obs: FoodObservation = serde_json::from_str(r#"{"food_name": "apple"}"#).unwrap();
        assert_eq!(obs.food_name, "apple");
        assert_eq!(obs.confidence, ConfidenceTier::Low);
        assert!(obs.components.is_empty());
    }
}
