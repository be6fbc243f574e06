//! Health profile and preference types
//!
//! Inputs to the risk model and the recommendation prompt.

use serde::{Deserialize, Serialize};

/// The fixed 5-field feature vector the pre-trained classifier expects
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskFeatures {
    pub pregnancies: f64,
    /// Plasma glucose concentration, mg/dL
    pub glucose: f64,
    /// 2-hour serum insulin, mu U/ml
    pub insulin: f64,
    /// Body mass index, kg/m^2
    pub bmi: f64,
    /// Age in years
    pub age: f64,
}

impl RiskFeatures {
    /// Feature vector in model column order
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.pregnancies,
            self.glucose,
            self.insulin,
            self.bmi,
            self.age,
        ]
    }
}

/// Health profile embedded in the recommendation prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Risk label from a prior prediction, e.g. "High" or "Low"
    pub diabetes_risk: Option<String>,
    pub glucose: Option<f64>,
    pub bmi: Option<f64>,
    pub age: Option<f64>,
    pub insulin: Option<f64>,
}

impl HealthProfile {
    fn fmt_value(v: &Option<f64>) -> String {
        v.map(|x| x.to_string()).unwrap_or_else(|| "Unknown".to_string())
    }

    /// Render the profile lines for the recommendation prompt
    pub fn prompt_block(&self) -> String {
        format!(
            "- Diabetes Risk: {}\n\
             - Blood Glucose Level: {} mg/dL\n\
             - BMI: {}\n\
             - Age: {}\n\
             - Insulin Level: {}",
            self.diabetes_risk.as_deref().unwrap_or("Unknown"),
            Self::fmt_value(&self.glucose),
            Self::fmt_value(&self.bmi),
            Self::fmt_value(&self.age),
            Self::fmt_value(&self.insulin),
        )
    }
}

/// Dietary preferences embedded in the recommendation prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPreferences {
    pub dietary_restrictions: Option<String>,
    pub cuisine_preferences: Option<String>,
    pub disliked_foods: Option<String>,
    pub cooking_skill: Option<String>,
    pub prep_time: Option<String>,
}

impl MealPreferences {
    /// Render the preference lines for the recommendation prompt
    pub fn prompt_block(&self) -> String {
        format!(
            "- Dietary Restrictions: {}\n\
             - Cuisine Preferences: {}\n\
             - Disliked Foods: {}\n\
             - Cooking Skill Level: {}\n\
             - Meal Prep Time: {}",
            self.dietary_restrictions.as_deref().unwrap_or("None"),
            self.cuisine_preferences.as_deref().unwrap_or("Any"),
            self.disliked_foods.as_deref().unwrap_or("None"),
            self.cooking_skill.as_deref().unwrap_or("Intermediate"),
            self.prep_time.as_deref().unwrap_or("Medium"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let features = RiskFeatures {
            pregnancies: 2.0,
            glucose: 120.0,
            insulin: 85.0,
            bmi: 28.5,
            age: 45.0,
        };
        assert_eq!(features.as_array(), [2.0, 120.0, 85.0, 28.5, 45.0]);
    }

    #[test]
    fn test_profile_prompt_defaults() {
        let block = HealthProfile::default().prompt_block();
        assert!(block.contains("Diabetes Risk: Unknown"));
        assert!(block.contains("BMI: Unknown"));

        let prefs = MealPreferences::default().prompt_block();
        assert!(prefs.contains("Cuisine Preferences: Any"));
        assert!(prefs.contains("Cooking Skill Level: Intermediate"));
    }
}
