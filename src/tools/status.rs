//! DDA Status Tool
//!
//! Provides runtime status information about the DDA service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage instructions for AI assistants
pub const ANALYSIS_INSTRUCTIONS: &str = r#"
# DDA Meal Analysis Instructions

This guide explains how to analyze meals and manage diabetes-related data
with the Diabetes Diet Assistant (DDA) tools.

## Analyzing a food photo

1. Call `analyze_meal_photo` with either `image_path` (a JPEG/PNG on disk)
   or `image_base64` (the encoded image bytes).
2. The response contains the identified food, the matched nutrition table
   entry with a match score, an estimated portion in grams, and
   portion-scaled nutrition including the glycemic index category.
3. A `provider_warning` field means the vision call failed and a
   low-confidence placeholder was analyzed; the numbers are defaults, not
   measurements.

## Working without a photo

- `identify_food` matches a free-text label ("vegetable salad") to the
  nutrition table and reports standard-portion nutrition.
- `estimate_nutrition` scales any label to an explicit portion in grams.
- `get_food_info` / `list_foods` expose the raw per-100g table.

## Tracking meals

- `save_meal` appends to the session history. With no arguments it saves
  the most recent analysis.
- `get_meal_history` lists saved meals, newest first.
- `daily_carb_summary` totals carbs and calories per day and compares
  against the 130 g/day recommended minimum.
- History is in-memory only and does not survive a server restart.

## Risk and recommendations

- `predict_diabetes_risk` takes pregnancies, glucose, insulin, bmi, and
  age, and returns the model probability with a classification.
- `get_meal_recommendations` builds personalized meal plans from a health
  profile and dietary preferences. A JSON object with an `error` key means
  the provider call or parse failed; there is no retry.
- `refine_meal_recommendation` improves one meal from user feedback.
"#;

/// Runtime status of the DDA service
#[derive(Debug, Clone, Serialize)]
pub struct DdaStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Configuration
    pub gemini_configured: bool,
    pub risk_threshold: f64,

    /// Data loaded
    pub foods_loaded: usize,
    pub meals_in_session: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    gemini_configured: bool,
    risk_threshold: f64,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(gemini_configured: bool, risk_threshold: f64) -> Self {
        Self {
            start_time: Instant::now(),
            gemini_configured,
            risk_threshold,
        }
    }

    /// Get the current status
    pub fn get_status(&self, foods_loaded: usize, meals_in_session: usize) -> DdaStatus {
        let build_info = BuildInfo::current();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        DdaStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            gemini_configured: self.gemini_configured,
            risk_threshold: self.risk_threshold,
            foods_loaded,
            meals_in_session,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
