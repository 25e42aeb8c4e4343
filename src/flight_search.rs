use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::FlightSearchError;
use crate::metrics::{inc_flight_search_error, inc_flight_search_success};

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";
const DATE_FORMAT: &str = "%Y-%m-%d";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of one provider lookup: the options parsed from `best_flights`
/// plus the undecoded payload, which the prompt composer embeds verbatim
/// (truncated) so the model sees everything the provider said.
#[derive(Debug, Clone)]
pub struct FlightData {
    pub options: Vec<FlightOption>,
    pub raw: Value,
}

/// Provider payload schema. Every field defaults so that a missing key
/// degrades the affected row instead of failing the whole deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightOption {
    #[serde(default)]
    pub flights: Vec<FlightSegment>,
    /// Total trip duration in minutes.
    #[serde(default)]
    pub total_duration: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub layovers: Vec<Layover>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSegment {
    #[serde(default)]
    pub airline: String,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub departure_airport: AirportStop,
    #[serde(default)]
    pub arrival_airport: AirportStop,
    /// Cabin features ("Wi-Fi for a fee", "Average legroom (31 in)", ...),
    /// including the carbon-emissions tags the formatter filters out.
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportStop {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Layover {
    #[serde(default)]
    pub name: String,
    /// Layover duration in minutes.
    #[serde(default)]
    pub duration: u32,
}

// TODO: fall back to `other_flights` when the provider returns an empty
// `best_flights` list.
#[derive(Debug, Default, Deserialize)]
struct FlightListing {
    #[serde(default)]
    best_flights: Vec<FlightOption>,
}

/// Uppercases a user-supplied airport code the way the provider expects it.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// One-shot client for the SerpAPI Google Flights engine. The key is
/// captured at startup; a client without one rejects every search with
/// `MissingApiKey`, which callers absorb as "no flight data".
#[derive(Debug, Clone)]
pub struct FlightSearchClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl FlightSearchClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(api_key, SERPAPI_ENDPOINT)
    }

    /// Same client against a different endpoint; tests point this at a
    /// local mock server.
    pub fn with_endpoint(api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            endpoint: endpoint.into(),
        }
    }

    /// Fetches one-way itineraries priced in USD for the given route. Exactly
    /// one attempt, bounded by a 10-second timeout; every failure comes back
    /// as an error value and never as a panic.
    #[instrument(name = "flight_search", skip(self))]
    pub async fn search(
        &self,
        origin: &str,
        destination: &str,
        date: &str,
    ) -> Result<FlightData, FlightSearchError> {
        let result = self.search_inner(origin, destination, date).await;
        match &result {
            Ok(data) => {
                info!("flight search returned {} option(s)", data.options.len());
                inc_flight_search_success();
            }
            Err(e) => {
                warn!("flight search failed: {}", e);
                inc_flight_search_error(e);
            }
        }
        result
    }

    async fn search_inner(
        &self,
        origin: &str,
        destination: &str,
        date: &str,
    ) -> Result<FlightData, FlightSearchError> {
        if origin.trim().is_empty() {
            return Err(FlightSearchError::MissingParameter("origin"));
        }
        if destination.trim().is_empty() {
            return Err(FlightSearchError::MissingParameter("destination"));
        }
        if date.trim().is_empty() {
            return Err(FlightSearchError::MissingParameter("start_date"));
        }
        // Reject dates the provider would bounce anyway, before spending the
        // API call.
        NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| FlightSearchError::InvalidDate(date.to_string()))?;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FlightSearchError::MissingApiKey)?;

        let origin_code = normalize_code(origin);
        let dest_code = normalize_code(destination);
        let date = date.trim();

        info!(
            "fetching flight data for {} to {} on {}",
            origin_code, dest_code, date
        );

        let params = [
            ("engine", "google_flights"),
            ("departure_id", origin_code.as_str()),
            ("arrival_id", dest_code.as_str()),
            ("outbound_date", date),
            ("currency", "USD"),
            ("hl", "en"),
            // type 2 = one-way
            ("type", "2"),
            ("api_key", api_key),
        ];

        let response = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| FlightSearchError::HttpRequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FlightSearchError::HttpRequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(FlightSearchError::ApiError(format!(
                "Status: {}, Response: {}",
                status, text
            )));
        }

        let raw: Value = serde_json::from_str(&text)
            .map_err(|e| FlightSearchError::InvalidResponse(e.to_string()))?;

        if let Some(message) = raw.get("error").and_then(|e| e.as_str()) {
            return Err(FlightSearchError::ApiError(message.to_string()));
        }

        let listing: FlightListing = serde_json::from_value(raw.clone())
            .map_err(|e| FlightSearchError::InvalidResponse(e.to_string()))?;
        debug!(
            "parsed provider payload with {} best flight(s)",
            listing.best_flights.len()
        );

        Ok(FlightData {
            options: listing.best_flights,
            raw,
        })
    }
}
