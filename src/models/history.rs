//! Session meal history
//!
//! In-memory, per-process state. Nothing here survives a restart; the
//! session context object is owned by the service and passed to handlers
//! explicitly.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::food::MealAnalysis;

/// Recommended daily minimum carbohydrate intake in grams
pub const RECOMMENDED_DAILY_CARBS_G: f64 = 130.0;

/// One saved meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealHistoryEntry {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Time of day: HH:MM
    pub time: String,
    /// Food label as identified (raw label, not the canonical key)
    pub food: String,
    /// Carbohydrate grams for the saved portion
    pub carbs: f64,
    /// Calories for the saved portion
    pub calories: f64,
}

/// Per-session mutable state
///
/// Owned by the service behind a mutex; handlers receive it explicitly
/// rather than reaching for process-global storage.
#[derive(Debug, Default)]
pub struct SessionState {
    entries: Vec<MealHistoryEntry>,
    /// Most recent analysis, kept so save_meal can default to it
    pub last_analysis: Option<MealAnalysis>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a meal entry stamped with the current local date and time
    pub fn save_meal_now(&mut self, food: &str, carbs: f64, calories: f64) -> MealHistoryEntry {
        let now = Local::now();
        let entry = MealHistoryEntry {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            food: food.to_string(),
            carbs,
            calories,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Append a meal entry with an explicit date and time
    pub fn save_meal(&mut self, entry: MealHistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries sorted most recent first
    pub fn entries_desc(&self) -> Vec<MealHistoryEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| (&b.date, &b.time).cmp(&(&a.date, &a.time)));
        sorted
    }

    /// Per-date carb and calorie totals, ascending by date
    pub fn daily_totals(&self) -> Vec<DailyTotal> {
        let mut totals: Vec<DailyTotal> = Vec::new();
        for entry in &self.entries {
            match totals.iter_mut().find(|t| t.date == entry.date) {
                Some(total) => {
                    total.carbs += entry.carbs;
                    total.calories += entry.calories;
                    total.meals += 1;
                }
                None => totals.push(DailyTotal {
                    date: entry.date.clone(),
                    carbs: entry.carbs,
                    calories: entry.calories,
                    meals: 1,
                }),
            }
        }
        totals.sort_by(|a, b| a.date.cmp(&b.date));
        totals
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard all saved meals
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }
}

/// Aggregated intake for a single date
#[derive(Debug, Clone, Serialize)]
pub struct DailyTotal {
    pub date: String,
    pub carbs: f64,
    pub calories: f64,
    pub meals: usize,
}
