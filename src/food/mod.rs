//! Food identification and nutrition pipeline
//!
//! Label matching, portion estimation, and per-100g scaling.

pub mod analysis;
pub mod calculator;
pub mod matcher;
pub mod portion;
pub mod table;

pub use analysis::{analyze_observation, MealAnalysis};
pub use calculator::{apply_gi_override, round1, scale_to_portion, GI_OVERRIDE_SCORE_THRESHOLD};
pub use matcher::{match_food, GENERIC_FALLBACKS};
pub use portion::{PortionEstimator, ReferencePortionEstimator, DEFAULT_PORTION_G};
pub use table::FoodTable;
