//! Pre-trained risk classifier
//!
//! A standardizing logistic regression over the fixed 5-feature vector.
//! Parameters were fitted elsewhere (Pima Indians diabetes dataset) and
//! load from a JSON file, with compiled-in defaults so the server runs
//! out of the box.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RiskFeatures;

/// Model loading errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model parameter file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("feature scales must be non-zero")]
    InvalidScale,
}

/// Contract of the pre-trained classifier
///
/// `predict_proba` returns `[P(no diabetes), P(diabetes)]`.
pub trait RiskModel: Send + Sync {
    fn predict_proba(&self, features: &RiskFeatures) -> [f64; 2];

    /// Held-out accuracy reported by the training run, as a percentage
    fn accuracy_pct(&self) -> Option<f64> {
        None
    }
}

/// Logistic regression with feature standardization
///
/// Feature order matches `RiskFeatures::as_array`: pregnancies, glucose,
/// insulin, BMI, age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub feature_means: [f64; 5],
    pub feature_scales: [f64; 5],
    pub coefficients: [f64; 5],
    pub intercept: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl LogisticModel {
    /// The compiled-in parameter set
    pub fn builtin() -> Self {
        Self {
            feature_means: [3.845, 120.895, 79.799, 31.993, 33.241],
            feature_scales: [3.367, 31.953, 115.169, 7.879, 11.753],
            coefficients: [0.322, 1.126, 0.184, 0.703, 0.349],
            intercept: -0.861,
            accuracy: Some(77.3),
        }
    }

    /// Load parameters from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&contents)?;
        if model.feature_scales.iter().any(|s| *s == 0.0) {
            return Err(ModelError::InvalidScale);
        }
        Ok(model)
    }

    /// Linear decision value over standardized features
    fn decision(&self, features: &RiskFeatures) -> f64 {
        let x = features.as_array();
        let mut sum = self.intercept;
        for i in 0..x.len() {
            let standardized = (x[i] - self.feature_means[i]) / self.feature_scales[i];
            sum += self.coefficients[i] * standardized;
        }
        sum
    }
}

impl RiskModel for LogisticModel {
    fn predict_proba(&self, features: &RiskFeatures) -> [f64; 2] {
        let p = sigmoid(self.decision(features));
        [1.0 - p, p]
    }

    fn accuracy_pct(&self) -> Option<f64> {
        self.accuracy
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(glucose: f64) -> RiskFeatures {
        RiskFeatures {
            pregnancies: 2.0,
            glucose,
            insulin: 80.0,
            bmi: 28.0,
            age: 40.0,
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = LogisticModel::builtin();
        let proba = model.predict_proba(&features(120.0));
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba[1] > 0.0 && proba[1] < 1.0);
    }

    #[test]
    fn test_risk_increases_with_glucose() {
        let model = LogisticModel::builtin();
        let low = model.predict_proba(&features(85.0))[1];
        let high = model.predict_proba(&features(190.0))[1];
        assert!(high > low);
    }

    #[test]
    fn test_extreme_profiles_separate() {
        let model = LogisticModel::builtin();
        let healthy = RiskFeatures {
            pregnancies: 0.0,
            glucose: 80.0,
            insulin: 50.0,
            bmi: 21.0,
            age: 22.0,
        };
        let at_risk = RiskFeatures {
            pregnancies: 8.0,
            glucose: 196.0,
            insulin: 280.0,
            bmi: 41.0,
            age: 58.0,
        };
        assert!(model.predict_proba(&healthy)[1] < 0.5);
        assert!(model.predict_proba(&at_risk)[1] > 0.5);
    }

    #[test]
    fn test_from_file_rejects_zero_scale() {
        let dir = std::env::temp_dir();
        let path = dir.join("dda_test_model_zero_scale.json");
        std::fs::write(
            &path,
            r#"{
                "feature_means": [0, 0, 0, 0, 0],
                "feature_scales": [1, 0, 1, 1, 1],
                "coefficients": [0, 0, 0, 0, 0],
                "intercept": 0
            }"#,
        )
        .unwrap();
        assert!(matches!(
            LogisticModel::from_file(&path),
            Err(ModelError::InvalidScale)
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("dda_test_model_round_trip.json");
        let builtin = LogisticModel::builtin();
        std::fs::write(&path, serde_json::to_string(&builtin).unwrap()).unwrap();

        let loaded = LogisticModel::from_file(&path).unwrap();
        assert_eq!(loaded.intercept, builtin.intercept);
        assert_eq!(loaded.accuracy, Some(77.3));
        let _ = std::fs::remove_file(&path);
    }
}
