use std::sync::Arc;

use crate::flight_search::FlightSearchClient;
use crate::llm::TextGenerator;

/// Shared handler state: the external-service clients, built once at startup
/// and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<FlightSearchClient>,
    pub generator: Arc<dyn TextGenerator>,
}
