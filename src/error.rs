use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure reasons for one outbound flight-provider call. Every variant is a
/// soft failure from the caller's point of view: plan generation continues
/// without flight data.
#[derive(Debug, Error)]
pub enum FlightSearchError {
    #[error("HTTP request failed: {0}")]
    HttpRequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Missing required flight search parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid departure date: {0}")]
    InvalidDate(String),
}

impl FlightSearchError {
    /// Stable label used as a metric attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            FlightSearchError::HttpRequestFailed(_) => "HttpRequestFailed",
            FlightSearchError::InvalidResponse(_) => "InvalidResponse",
            FlightSearchError::ApiError(_) => "ApiError",
            FlightSearchError::MissingApiKey => "MissingApiKey",
            FlightSearchError::MissingParameter(_) => "MissingParameter",
            FlightSearchError::InvalidDate(_) => "InvalidDate",
        }
    }
}

/// Errors that terminate a request with a non-200 status. Model failures are
/// not represented here; handlers convert those into `success: false`
/// payloads instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
