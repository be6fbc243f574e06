//! Diabetes Diet Assistant (DDA)
//!
//! An MCP server for diabetes risk prediction and meal analysis.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

mod build_info;
mod config;
mod food;
mod imaging;
mod mcp;
mod models;
mod providers;
mod risk;
mod tools;

use config::Config;
use food::{FoodTable, ReferencePortionEstimator};
use mcp::DdaService;
use providers::{GeminiRecommendationProvider, GeminiVisionProvider};
use risk::LogisticModel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dda=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    // Load configuration from environment
    let config = Config::from_env();
    if config.gemini_api_key.is_none() {
        eprintln!("Warning: no Gemini API key configured; vision and recommendation tools will report errors");
    }

    // Load the pre-trained risk model (compiled-in defaults unless DDA_MODEL_PATH is set)
    let model = match &config.model_path {
        Some(path) => {
            eprintln!("Loading risk model parameters from {}", path.display());
            LogisticModel::from_file(path)?
        }
        None => LogisticModel::builtin(),
    };

    // Build the nutrition table and providers
    let table = FoodTable::builtin();
    eprintln!("Nutrition table loaded: {} foods", table.len());

    let vision = GeminiVisionProvider::new(&config);
    let recommender = GeminiRecommendationProvider::new(&config);
    let estimator = ReferencePortionEstimator::new();

    // Create the DDA service
    let service = DdaService::new(
        config,
        table,
        Arc::new(vision),
        Arc::new(recommender),
        Arc::new(estimator),
        Arc::new(model),
    );

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
