//! Nutrition data structures
//!
//! Per-100g records for the static food table and the portion-scaled
//! facts derived from them.

use serde::{Deserialize, Serialize};

/// Glycemic index category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiLevel {
    Low,
    Medium,
    High,
}

impl GiLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiLevel::Low => "low",
            GiLevel::Medium => "medium",
            GiLevel::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(GiLevel::Low),
            "medium" => Some(GiLevel::Medium),
            "high" => Some(GiLevel::High),
            _ => None,
        }
    }

    /// Human-readable description of this GI category
    pub fn description(&self) -> &'static str {
        match self {
            GiLevel::Low => {
                "Low glycemic index (55 or less) - Slow carbohydrate absorption, \
                 smaller rise in blood glucose levels"
            }
            GiLevel::Medium => {
                "Medium glycemic index (56-69) - Moderate carbohydrate absorption \
                 and blood glucose response"
            }
            GiLevel::High => {
                "High glycemic index (70 or more) - Rapid carbohydrate absorption, \
                 higher blood glucose spike"
            }
        }
    }

    /// Diabetes management tip for foods in this GI category
    pub fn diabetes_tip(&self) -> &'static str {
        match self {
            GiLevel::Low => {
                "Foods with low GI are generally good choices for people with diabetes \
                 as they cause a slower, smaller rise in blood glucose levels."
            }
            GiLevel::Medium => {
                "Medium GI foods should be consumed in moderation. Consider pairing \
                 with protein or healthy fats to reduce the glycemic impact."
            }
            GiLevel::High => {
                "High GI foods can cause rapid spikes in blood sugar. Limit portions, \
                 combine with low GI foods, or choose lower GI alternatives when possible."
            }
        }
    }
}

/// Where a displayed GI category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiSource {
    /// Taken from the matched nutrition table entry
    Database,
    /// Overridden by the vision provider's carb estimate (low-confidence match)
    AiEstimate,
}

/// One entry of the static nutrition table, values per 100g
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Canonical food name (lowercase, unique within the table)
    pub name: String,
    pub carbs: f64,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub gi: GiLevel,
}

/// Nutrition values scaled to an estimated portion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub gi: GiLevel,
    pub gi_source: GiSource,
}
