//! Diabetes risk prediction tool
//!
//! Wraps the pre-trained classifier with threshold classification and
//! display-oriented fields.

use serde::Serialize;

use crate::food::round1;
use crate::models::RiskFeatures;
use crate::risk::RiskModel;

/// Response for predict_diabetes_risk
#[derive(Debug, Serialize)]
pub struct PredictRiskResponse {
    /// P(diabetes) as a percentage, two implied decimals
    pub probability_pct: f64,
    /// "Diabetes" or "No Diabetes" under the configured threshold
    pub prediction: String,
    pub is_diabetes: bool,
    pub threshold: f64,
    /// Held-out accuracy of the underlying model, when reported
    pub model_accuracy_pct: Option<f64>,
    /// Guidance matching the classification
    pub note: String,
}

/// Run the classifier over one feature vector
pub fn predict_risk(
    model: &dyn RiskModel,
    features: &RiskFeatures,
    threshold: f64,
) -> PredictRiskResponse {
    let proba = model.predict_proba(features);
    let probability = proba[1];
    let is_diabetes = probability >= threshold;

    let note = if is_diabetes {
        "This prediction suggests a higher risk of diabetes. Please consult with a \
         healthcare professional for proper diagnosis and advice."
    } else {
        "This prediction suggests a lower risk of diabetes. However, maintaining a \
         healthy lifestyle is still important."
    };

    PredictRiskResponse {
        probability_pct: round2_pct(probability),
        prediction: if is_diabetes { "Diabetes" } else { "No Diabetes" }.to_string(),
        is_diabetes,
        threshold,
        model_accuracy_pct: model.accuracy_pct(),
        note: note.to_string(),
    }
}

/// Percentage rounded to two decimals
fn round2_pct(probability: f64) -> f64 {
    round1(probability * 1000.0) / 10.0
}
