use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::flight_format::format_flight_table;
use crate::flight_search::{FlightData, normalize_code};
use crate::models::{ChatRequest, TravelRequest};
use crate::prompt::{self, ChatFlightContext, FlightContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct PlanResponse {
    success: bool,
    plan: String,
    flight_details: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    success: bool,
    response: String,
    flight_details: Option<String>,
}

#[derive(Debug, Serialize)]
struct FailureResponse {
    success: bool,
    error: String,
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy"}))
}

#[instrument(name = "plan_trip", skip(state, request))]
pub async fn plan_trip(
    State(state): State<AppState>,
    Json(request): Json<TravelRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    info!(
        origin = %request.origin,
        destination = %request.destination,
        start_date = %request.start_date,
        end_date = %request.end_date,
        travelers = request.travelers,
        include_flights = request.include_flights,
        "new travel plan request"
    );

    let flight_data = if request.include_flights {
        lookup_flights(
            &state,
            &request.origin,
            &request.destination,
            &request.start_date,
        )
        .await
    } else {
        None
    };

    let context = if !request.include_flights {
        FlightContext::NotRequested
    } else {
        match &flight_data {
            Some(data) => FlightContext::Available(data),
            None => FlightContext::Unavailable,
        }
    };
    let prompt = prompt::plan_prompt(&request, context);

    match state.generator.generate(&prompt).await {
        Ok(plan) => {
            let flight_details = flight_data.as_ref().map(|data| {
                format_flight_table(
                    Some(data),
                    &normalize_code(&request.origin),
                    &normalize_code(&request.destination),
                    request.start_date.trim(),
                )
            });
            Ok(Json(PlanResponse {
                success: true,
                plan,
                flight_details,
            })
            .into_response())
        }
        Err(e) => Ok(generation_failure("Error generating travel plan", &e.to_string())),
    }
}

#[instrument(name = "chat", skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let wants_flights = request.include_flights || prompt::needs_flight_data(&request.question);

    let flight_details = if wants_flights {
        info!("question appears flight-related, fetching fresh flight data");
        let origin = request.origin.as_deref().unwrap_or_default();
        let destination = request.destination.as_deref().unwrap_or_default();
        let date = request.start_date.as_deref().unwrap_or_default();
        lookup_flights(&state, origin, destination, date)
            .await
            .map(|data| {
                format_flight_table(
                    Some(&data),
                    &normalize_code(origin),
                    &normalize_code(destination),
                    date.trim(),
                )
            })
    } else {
        None
    };

    let context = match (&flight_details, wants_flights) {
        (Some(table), _) => ChatFlightContext::Table(table),
        (None, true) => ChatFlightContext::Unavailable,
        (None, false) => ChatFlightContext::NotRequested,
    };

    let prompt = prompt::chat_prompt(&request.travel_plan, &request.question, context);

    match state.generator.generate(&prompt).await {
        Ok(answer) => Ok(Json(ChatResponse {
            success: true,
            response: answer,
            flight_details,
        })
        .into_response()),
        Err(e) => Ok(generation_failure("Error answering question", &e.to_string())),
    }
}

/// One flight lookup, absorbed to `None` on any failure so generation always
/// proceeds.
async fn lookup_flights(
    state: &AppState,
    origin: &str,
    destination: &str,
    date: &str,
) -> Option<FlightData> {
    match state.flights.search(origin, destination, date).await {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("continuing without flight data: {}", e);
            None
        }
    }
}

/// Model failures come back as 200 with `success: false`, annotated with the
/// credential hint when the message points at the key.
fn generation_failure(prefix: &str, detail: &str) -> Response {
    let mut message = format!("{}: {}", prefix, detail);
    if detail.contains("API key") {
        message.push_str("\nPlease check your GEMINI_API_KEY in the .env file.");
    }
    warn!("generation failed: {}", message);
    Json(FailureResponse {
        success: false,
        error: message,
    })
    .into_response()
}
