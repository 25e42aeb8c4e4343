use serde::Deserialize;

use crate::error::ApiError;

/// Body of `POST /plan-trip`.
#[derive(Debug, Clone, Deserialize)]
pub struct TravelRequest {
    pub origin: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub budget: f64,
    pub travelers: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub include_flights: bool,
}

impl TravelRequest {
    /// Invariants beyond what deserialization enforces. Dates stay free text
    /// on purpose; a malformed date only matters to the flight lookup, which
    /// degrades softly on its own.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.travelers < 1 {
            return Err(ApiError::Validation(
                "travelers must be at least 1".to_string(),
            ));
        }
        if self.budget < 0.0 {
            return Err(ApiError::Validation(
                "budget must be non-negative".to_string(),
            ));
        }
        if self.include_flights
            && (self.origin.trim().is_empty() || self.destination.trim().is_empty())
        {
            return Err(ApiError::Validation(
                "origin and destination are required when include_flights is set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body of `POST /chat`. `travel_plan` is the previously generated plan,
/// carried back verbatim as context. The route fields are optional; when the
/// question calls for fresh flight data and they are absent, the lookup
/// degrades softly instead of failing the request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub travel_plan: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub include_flights: bool,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.question.trim().is_empty() {
            return Err(ApiError::Validation(
                "question must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
