pub mod config;
pub mod error;
pub mod flight_format;
pub mod flight_search;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod otel;
pub mod prompt;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Router shared by the binary and the integration tests.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/plan-trip", post(routes::plan_trip))
        .route("/chat", post(routes::chat))
        .nest_service("/static", ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
