//! DDA MCP Server Implementation
//!
//! Implements the MCP server with all DDA tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::food::{FoodTable, PortionEstimator};
use crate::imaging;
use crate::models::{
    FoodObservation, HealthProfile, MealPreferences, RiskFeatures, SessionState,
};
use crate::providers::{ProviderError, RecommendationProvider, VisionProvider};
use crate::risk::RiskModel;
use crate::tools::status::StatusTracker;
use crate::tools::{analysis, history, recommend, risk, ErrorResponse};

/// DDA MCP Service
#[derive(Clone)]
pub struct DdaService {
    table: Arc<FoodTable>,
    vision: Arc<dyn VisionProvider>,
    recommender: Arc<dyn RecommendationProvider>,
    estimator: Arc<dyn PortionEstimator>,
    model: Arc<dyn RiskModel>,
    risk_threshold: f64,
    /// Explicit session context: meal history plus the last analysis
    session: Arc<std::sync::Mutex<SessionState>>,
    status_tracker: Arc<Mutex<StatusTracker>>,
    tool_router: ToolRouter<DdaService>,
}

impl DdaService {
    pub fn new(
        config: Config,
        table: FoodTable,
        vision: Arc<dyn VisionProvider>,
        recommender: Arc<dyn RecommendationProvider>,
        estimator: Arc<dyn PortionEstimator>,
        model: Arc<dyn RiskModel>,
    ) -> Self {
        let gemini_configured = config.gemini_api_key.is_some();
        Self {
            table: Arc::new(table),
            vision,
            recommender,
            estimator,
            model,
            risk_threshold: config.risk_threshold,
            session: Arc::new(std::sync::Mutex::new(SessionState::new())),
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                gemini_configured,
                config.risk_threshold,
            ))),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Analysis Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeMealPhotoParams {
    /// Path to a JPEG/PNG image file on disk (provide either image_path OR image_base64)
    pub image_path: Option<String>,
    /// Base64-encoded image bytes (provide either image_path OR image_base64)
    pub image_base64: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdentifyFoodParams {
    /// Free-text food label, e.g. "vegetable salad"
    pub label: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodInfoParams {
    /// Canonical food name, e.g. "apple"
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateNutritionParams {
    /// Food label (matched against the nutrition table)
    pub food: String,
    /// Portion mass in grams (must be non-negative)
    pub portion_grams: f64,
}

// ============================================================================
// Risk Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PredictRiskParams {
    /// Number of pregnancies
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

// ============================================================================
// Recommendation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMealRecommendationsParams {
    /// Risk label from a prior prediction, e.g. "High" or "Low"
    pub diabetes_risk: Option<String>,
    /// Blood glucose level, mg/dL
    pub glucose: Option<f64>,
    /// Body mass index
    pub bmi: Option<f64>,
    /// Age in years
    pub age: Option<f64>,
    /// Insulin level
    pub insulin: Option<f64>,
    /// e.g. "vegetarian, no nuts"
    pub dietary_restrictions: Option<String>,
    /// e.g. "Mediterranean, Japanese"
    pub cuisine_preferences: Option<String>,
    /// Foods to avoid in suggestions
    pub disliked_foods: Option<String>,
    /// e.g. "Beginner", "Intermediate", "Advanced"
    pub cooking_skill: Option<String>,
    /// e.g. "Quick", "Medium", "Elaborate"
    pub prep_time: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RefineMealParams {
    /// Name of the meal to improve
    pub meal_name: String,
    /// The user's feedback about the meal
    pub feedback: String,
}

// ============================================================================
// History Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveMealParams {
    /// Food label (defaults to the last analyzed food)
    pub food: Option<String>,
    /// Carbohydrate grams (defaults to the last analysis)
    pub carbs: Option<f64>,
    /// Calories (defaults to the last analysis)
    pub calories: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyCarbSummaryParams {
    /// Restrict the summary to one date (ISO format: YYYY-MM-DD)
    pub date: Option<String>,
}

#[tool_router]
impl DdaService {
    // --- Status ---

    #[tool(description = "Get the current status of the DDA service including build info, configuration, and process information")]
    async fn dda_status(&self) -> Result<CallToolResult, McpError> {
        let meals_in_session = {
            let session = self.session.lock().map_err(lock_error)?;
            session.len()
        };
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(self.table.len(), meals_in_session);
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for analyzing meals and tracking carbohydrate intake. Call this when starting a new session or when unsure how to use the analysis tools.")]
    fn analysis_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ANALYSIS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ANALYSIS_INSTRUCTIONS)]))
    }

    // --- Food Analysis ---

    #[tool(description = "Analyze a food photo: identify the food with the vision AI, match it to the nutrition table, estimate the portion, and compute portion-scaled nutrition with glycemic index")]
    async fn analyze_meal_photo(
        &self,
        Parameters(p): Parameters<AnalyzeMealPhotoParams>,
    ) -> Result<CallToolResult, McpError> {
        // Decode the image first; malformed input aborts this action
        let image = match (&p.image_path, &p.image_base64) {
            (Some(path), None) => imaging::load_from_path(path),
            (None, Some(data)) => imaging::load_from_base64(data),
            _ => {
                return Err(McpError::invalid_params(
                    "provide exactly one of image_path or image_base64",
                    None,
                ))
            }
        }
        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let payload = imaging::to_jpeg_base64(&image)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        // Provider failures degrade to a placeholder observation so the
        // pipeline still returns a complete result
        let (observation, warning) = match self.vision.analyze_food_image(&payload).await {
            Ok(observation) => (observation, None),
            Err(error) => {
                tracing::warn!("vision provider failed: {}", error);
                let label = match &error {
                    ProviderError::Api { .. } | ProviderError::Http(_) => "unknown",
                    _ => "error",
                };
                (FoodObservation::degraded(label), Some(error.to_string()))
            }
        };

        let (response, record) = analysis::build_analysis_with_record(
            &observation,
            warning,
            Some(&image),
            &self.table,
            self.estimator.as_ref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;

        {
            let mut session = self.session.lock().map_err(lock_error)?;
            session.last_analysis = Some(record);
        }

        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Match a free-text food label to the nutrition table and report nutrition at the standard portion")]
    fn identify_food(
        &self,
        Parameters(p): Parameters<IdentifyFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = analysis::identify_food(&p.label, &self.table)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get per-100g nutrition, glycemic index, and standard portion for one food in the table")]
    fn get_food_info(
        &self,
        Parameters(p): Parameters<GetFoodInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        let json = match analysis::get_food_info(&p.name, &self.table) {
            Some(info) => serde_json::to_string_pretty(&info),
            None => serde_json::to_string_pretty(&ErrorResponse::new(format!(
                "food '{}' not found in nutrition table",
                p.name
            ))),
        }
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List all foods in the nutrition table with per-100g carbs, calories, and glycemic index")]
    fn list_foods(&self) -> Result<CallToolResult, McpError> {
        let result = analysis::list_foods(&self.table);
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Scale a food's nutrition to an explicit portion in grams (the label is fuzzy-matched against the table)")]
    fn estimate_nutrition(
        &self,
        Parameters(p): Parameters<EstimateNutritionParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = analysis::estimate_nutrition(&p.food, p.portion_grams, &self.table)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Risk Prediction ---

    #[tool(description = "Predict diabetes risk from pregnancies, glucose, insulin, BMI, and age using the pre-trained classifier")]
    fn predict_diabetes_risk(
        &self,
        Parameters(p): Parameters<PredictRiskParams>,
    ) -> Result<CallToolResult, McpError> {
        let features = RiskFeatures {
            pregnancies: p.pregnancies,
            glucose: p.glucose,
            insulin: p.insulin,
            bmi: p.bmi,
            age: p.age,
        };
        let result = risk::predict_risk(self.model.as_ref(), &features, self.risk_threshold);
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Meal Recommendations ---

    #[tool(description = "Generate personalized diabetes-friendly meal plans from a health profile and dietary preferences. A response with an 'error' key means the provider call failed.")]
    async fn get_meal_recommendations(
        &self,
        Parameters(p): Parameters<GetMealRecommendationsParams>,
    ) -> Result<CallToolResult, McpError> {
        let profile = HealthProfile {
            diabetes_risk: p.diabetes_risk,
            glucose: p.glucose,
            bmi: p.bmi,
            age: p.age,
            insulin: p.insulin,
        };
        let preferences = MealPreferences {
            dietary_restrictions: p.dietary_restrictions,
            cuisine_preferences: p.cuisine_preferences,
            disliked_foods: p.disliked_foods,
            cooking_skill: p.cooking_skill,
            prep_time: p.prep_time,
        };

        let result = self
            .recommender
            .meal_recommendations(&profile, &preferences)
            .await;
        let outcome = recommend::render_recommendations(result);
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Improve one recommended meal based on user feedback")]
    async fn refine_meal_recommendation(
        &self,
        Parameters(p): Parameters<RefineMealParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.recommender.refine_meal(&p.meal_name, &p.feedback).await;
        let outcome = recommend::render_refinement(result);
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Meal History ---

    #[tool(description = "Save a meal to the session history. With no arguments, saves the most recently analyzed meal.")]
    fn save_meal(
        &self,
        Parameters(p): Parameters<SaveMealParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().map_err(lock_error)?;
        let result = history::save_meal(&mut session, p.food, p.carbs, p.calories)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List saved meals for this session, most recent first")]
    fn get_meal_history(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().map_err(lock_error)?;
        let result = history::get_meal_history(&session);
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Clear the session meal history")]
    fn clear_meal_history(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().map_err(lock_error)?;
        let result = history::clear_meal_history(&mut session);
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Total saved carbs and calories per day, compared against the recommended 130g/day carbohydrate minimum")]
    fn daily_carb_summary(
        &self,
        Parameters(p): Parameters<DailyCarbSummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().map_err(lock_error)?;
        let result = history::daily_carb_summary(&session, p.date.as_deref());
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

/// Map a poisoned session lock to an MCP error
fn lock_error<T>(_: std::sync::PoisonError<T>) -> McpError {
    McpError::internal_error("session state lock poisoned", None)
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for DdaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "dda".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Diabetes Diet Assistant".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Diabetes Diet Assistant (DDA) - Risk prediction, food photo analysis, and meal planning. \
                 IMPORTANT: Call analysis_instructions when starting a session. \
                 Analysis: analyze_meal_photo (image_path or image_base64), identify_food, \
                 get_food_info, list_foods, estimate_nutrition. \
                 Risk: predict_diabetes_risk (pregnancies, glucose, insulin, bmi, age). \
                 Recommendations: get_meal_recommendations, refine_meal_recommendation. \
                 History: save_meal (defaults to last analysis), get_meal_history, \
                 clear_meal_history, daily_carb_summary. History is in-memory per session."
                    .into(),
            ),
        }
    }
}
