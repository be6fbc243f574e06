//! Meal history tools
//!
//! Session-scoped save/list/clear and daily carbohydrate summaries.

use serde::Serialize;

use crate::models::{MealHistoryEntry, SessionState, RECOMMENDED_DAILY_CARBS_G};

/// Response for save_meal
#[derive(Debug, Serialize)]
pub struct SaveMealResponse {
    pub saved: MealHistoryEntry,
    pub total_entries: usize,
}

/// Save a meal to the session history
///
/// When food/carbs/calories are omitted the most recent analysis is
/// saved; explicit values always win.
pub fn save_meal(
    state: &mut SessionState,
    food: Option<String>,
    carbs: Option<f64>,
    calories: Option<f64>,
) -> Result<SaveMealResponse, String> {
    let last = state.last_analysis.clone();
    let food = food
        .or_else(|| last.as_ref().map(|a| a.identified_food.clone()))
        .ok_or_else(|| "no food given and no analysis to save; run analyze_meal_photo first".to_string())?;
    let carbs = carbs
        .or_else(|| last.as_ref().map(|a| a.nutrition.carbs))
        .ok_or_else(|| "no carbs given and no analysis to save".to_string())?;
    let calories = calories
        .or_else(|| last.as_ref().map(|a| a.nutrition.calories))
        .ok_or_else(|| "no calories given and no analysis to save".to_string())?;

    if carbs < 0.0 || calories < 0.0 {
        return Err("carbs and calories must be non-negative".to_string());
    }

    let saved = state.save_meal_now(&food, carbs, calories);
    Ok(SaveMealResponse {
        saved,
        total_entries: state.len(),
    })
}

/// Response for get_meal_history
#[derive(Debug, Serialize)]
pub struct MealHistoryResponse {
    /// Entries, most recent first
    pub entries: Vec<MealHistoryEntry>,
    pub total: usize,
}

pub fn get_meal_history(state: &SessionState) -> MealHistoryResponse {
    let entries = state.entries_desc();
    MealHistoryResponse {
        total: entries.len(),
        entries,
    }
}

/// Response for clear_meal_history
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub cleared: usize,
}

pub fn clear_meal_history(state: &mut SessionState) -> ClearHistoryResponse {
    ClearHistoryResponse {
        cleared: state.clear(),
    }
}

/// One day's intake next to the recommended minimum
#[derive(Debug, Serialize)]
pub struct DailySummaryRow {
    pub date: String,
    pub carbs: f64,
    pub calories: f64,
    pub meals: usize,
    /// Carbs relative to the recommended daily minimum (negative = under)
    pub carbs_vs_recommended_min: f64,
}

/// Response for daily_carb_summary
#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub days: Vec<DailySummaryRow>,
    pub recommended_min_carbs_g: f64,
}

/// Aggregate saved meals per date
///
/// With `date` set, only that day is reported (empty when nothing was
/// saved for it).
pub fn daily_carb_summary(state: &SessionState, date: Option<&str>) -> DailySummaryResponse {
    let days = state
        .daily_totals()
        .into_iter()
        .filter(|total| date.map_or(true, |d| total.date == d))
        .map(|total| DailySummaryRow {
            carbs_vs_recommended_min: crate::food::round1(total.carbs - RECOMMENDED_DAILY_CARBS_G),
            date: total.date,
            carbs: total.carbs,
            calories: total.calories,
            meals: total.meals,
        })
        .collect();

    DailySummaryResponse {
        days,
        recommended_min_carbs_g: RECOMMENDED_DAILY_CARBS_G,
    }
}
