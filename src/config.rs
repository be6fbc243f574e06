//! Runtime configuration
//!
//! Collects environment-derived settings in one place so the service and
//! providers never read the environment themselves.

use std::path::PathBuf;

/// Default Gemini generateContent endpoint (vision and text share it)
pub const DEFAULT_GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Default probability threshold for classifying a prediction as diabetes
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.5;

/// Runtime configuration for the DDA service
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key; vision/recommendation calls fail with a provider
    /// error when absent
    pub gemini_api_key: Option<String>,
    /// Gemini generateContent endpoint URL
    pub gemini_api_url: String,
    /// Optional path to a risk model parameter file
    pub model_path: Option<PathBuf>,
    /// Probability threshold for the diabetes classification
    pub risk_threshold: f64,
}

impl Config {
    /// Build a Config from environment variables, falling back to defaults
    ///
    /// Recognized variables:
    /// - `DDA_GEMINI_API_KEY` (or `GEMINI_API_KEY`)
    /// - `DDA_GEMINI_API_URL`
    /// - `DDA_MODEL_PATH`
    /// - `DDA_RISK_THRESHOLD`
    pub fn from_env() -> Self {
        let gemini_api_key = std::env::var("DDA_GEMINI_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let gemini_api_url = std::env::var("DDA_GEMINI_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());

        let model_path = std::env::var("DDA_MODEL_PATH").ok().map(PathBuf::from);

        let risk_threshold = std::env::var("DDA_RISK_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|t| (0.0..=1.0).contains(t))
            .unwrap_or(DEFAULT_RISK_THRESHOLD);

        Self {
            gemini_api_key,
            gemini_api_url,
            model_path,
            risk_threshold,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_url: DEFAULT_GEMINI_URL.to_string(),
            model_path: None,
            risk_threshold: DEFAULT_RISK_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_api_url, DEFAULT_GEMINI_URL);
        assert_eq!(config.risk_threshold, DEFAULT_RISK_THRESHOLD);
    }
}
