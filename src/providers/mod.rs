//! External AI providers
//!
//! Gemini-backed vision and text-generation collaborators behind narrow
//! trait contracts.

pub mod gemini;
pub mod recommend;
pub mod vision;

pub use gemini::{GeminiClient, ProviderError};
pub use recommend::{
    GeminiRecommendationProvider, MealAlternative, MealPlan, MealRecommendations,
    RecommendationProvider, RefinedMeal,
};
pub use vision::{GeminiVisionProvider, VisionProvider};
