use std::sync::Arc;

use dotenv::dotenv;
use tracing::{info, warn};

use travel_planner::config::AppConfig;
use travel_planner::flight_search::FlightSearchClient;
use travel_planner::llm::GeminiGenerator;
use travel_planner::{AppState, app, otel};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    // OTEL graceful shutdown on success or error exit
    let _otel_guard = otel::init_otel()?;

    let config = AppConfig::from_env();
    if config.serp_api_key.is_none() {
        warn!("SERP_API_KEY not set; flight lookups will be skipped");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; plan generation will fail until it is configured");
    }

    let state = AppState {
        flights: Arc::new(FlightSearchClient::new(config.serp_api_key.clone())),
        generator: Arc::new(GeminiGenerator::new(config.gemini_api_key.as_deref())),
    };

    let addr = format!("{}:{}", config.host, config.port);
    info!("starting travel planner on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
