use std::sync::Arc;

use async_trait::async_trait;
use mockito::{Matcher, Server};
use serde_json::{Value, json};

use travel_planner::flight_search::FlightSearchClient;
use travel_planner::llm::{LlmError, TextGenerator};
use travel_planner::{AppState, app};

/// Echoes the prompt back so tests can assert on what the model was asked.
struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(format!("GENERATED PLAN\n{}", prompt))
    }
}

struct FailingGenerator(&'static str);

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Completion(self.0.to_string()))
    }
}

async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn state_with(flights: FlightSearchClient, generator: Arc<dyn TextGenerator>) -> AppState {
    AppState {
        flights: Arc::new(flights),
        generator,
    }
}

fn plan_request_body() -> Value {
    json!({
        "origin": "JFK",
        "destination": "LAX",
        "start_date": "2024-06-01",
        "end_date": "2024-06-05",
        "budget": 2000,
        "travelers": 2,
        "interests": ["beach"],
        "include_flights": false
    })
}

fn provider_body() -> Value {
    json!({
        "best_flights": [
            {
                "flights": [
                    {
                        "airline": "Delta",
                        "flight_number": "DL 423",
                        "departure_airport": {
                            "name": "John F. Kennedy International Airport",
                            "time": "2024-06-01 08:15"
                        },
                        "arrival_airport": {
                            "name": "Los Angeles International Airport",
                            "time": "2024-06-01 11:45"
                        },
                        "extensions": ["Wi-Fi for a fee"]
                    }
                ],
                "total_duration": 390,
                "price": 236
            }
        ]
    })
}

#[tokio::test]
async fn plan_without_flights_skips_lookup() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let state = state_with(
        FlightSearchClient::with_endpoint(Some("key".to_string()), provider.url()),
        Arc::new(EchoGenerator),
    );
    let base = spawn_app(state).await;

    let response = reqwest::Client::new()
        .post(format!("{}/plan-trip", base))
        .json(&plan_request_body())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["flight_details"], Value::Null);
    assert!(!body["plan"].as_str().unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn plan_with_failing_provider_still_succeeds() {
    let mut provider = Server::new_async().await;
    let _mock = provider
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let state = state_with(
        FlightSearchClient::with_endpoint(Some("key".to_string()), provider.url()),
        Arc::new(EchoGenerator),
    );
    let base = spawn_app(state).await;

    let mut request = plan_request_body();
    request["include_flights"] = json!(true);
    let body: Value = reqwest::Client::new()
        .post(format!("{}/plan-trip", base))
        .json(&request)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["flight_details"], Value::Null);
    // The echoed prompt carries the degradation note.
    assert!(
        body["plan"]
            .as_str()
            .unwrap()
            .contains("Could not retrieve flight information")
    );
}

#[tokio::test]
async fn plan_with_flights_returns_formatted_table() {
    let mut provider = Server::new_async().await;
    let _mock = provider
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(provider_body().to_string())
        .create_async()
        .await;

    let state = state_with(
        FlightSearchClient::with_endpoint(Some("key".to_string()), provider.url()),
        Arc::new(EchoGenerator),
    );
    let base = spawn_app(state).await;

    let mut request = plan_request_body();
    request["include_flights"] = json!(true);
    let body: Value = reqwest::Client::new()
        .post(format!("{}/plan-trip", base))
        .json(&request)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(true));
    let details = body["flight_details"].as_str().unwrap();
    assert!(details.starts_with("## Available Flight Options"));
    assert!(details.contains("Delta DL 423"));
    assert!(details.contains("6h 30m"));
    assert!(
        body["plan"]
            .as_str()
            .unwrap()
            .contains("analyze these flight options")
    );
}

#[tokio::test]
async fn chat_flight_question_triggers_lookup() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(provider_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let state = state_with(
        FlightSearchClient::with_endpoint(Some("key".to_string()), provider.url()),
        Arc::new(EchoGenerator),
    );
    let base = spawn_app(state).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .json(&json!({
            "question": "What's the cheapest fare?",
            "travel_plan": "Day 1: arrive at LAX.",
            "origin": "JFK",
            "destination": "LAX",
            "start_date": "2024-06-01"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body["success"], json!(true));
    assert!(
        body["flight_details"]
            .as_str()
            .unwrap()
            .contains("Delta DL 423")
    );
    assert!(
        body["response"]
            .as_str()
            .unwrap()
            .contains("Real-Time Flight Data")
    );
}

#[tokio::test]
async fn chat_non_flight_question_skips_lookup() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let state = state_with(
        FlightSearchClient::with_endpoint(Some("key".to_string()), provider.url()),
        Arc::new(EchoGenerator),
    );
    let base = spawn_app(state).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .json(&json!({
            "question": "What should I pack?",
            "travel_plan": "Day 1: arrive at LAX."
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["flight_details"], Value::Null);
}

#[tokio::test]
async fn chat_flight_question_without_route_degrades() {
    // The keyword fires but the request carries no route; the lookup
    // soft-fails and the prompt notes it.
    let state = state_with(FlightSearchClient::new(None), Arc::new(EchoGenerator));
    let base = spawn_app(state).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .json(&json!({
            "question": "How much is the ticket?",
            "travel_plan": "Day 1: arrive."
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["flight_details"], Value::Null);
    assert!(
        body["response"]
            .as_str()
            .unwrap()
            .contains("Could not retrieve real-time flight information")
    );
}

#[tokio::test]
async fn invalid_plan_request_returns_400() {
    let state = state_with(FlightSearchClient::new(None), Arc::new(EchoGenerator));
    let base = spawn_app(state).await;

    let mut request = plan_request_body();
    request["travelers"] = json!(0);
    let response = reqwest::Client::new()
        .post(format!("{}/plan-trip", base))
        .json(&request)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("travelers"));
}

#[tokio::test]
async fn model_failure_mentioning_api_key_gets_hint() {
    let state = state_with(
        FlightSearchClient::new(None),
        Arc::new(FailingGenerator("API key not valid")),
    );
    let base = spawn_app(state).await;

    let response = reqwest::Client::new()
        .post(format!("{}/plan-trip", base))
        .json(&plan_request_body())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("API key not valid"));
    assert!(error.contains("Please check your GEMINI_API_KEY in the .env file."));
}

#[tokio::test]
async fn model_failure_without_credential_text_has_no_hint() {
    let state = state_with(
        FlightSearchClient::new(None),
        Arc::new(FailingGenerator("quota exceeded")),
    );
    let base = spawn_app(state).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .json(&json!({
            "question": "What should I pack?",
            "travel_plan": "Day 1: arrive."
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(false));
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("quota exceeded"));
    assert!(!error.contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let state = state_with(FlightSearchClient::new(None), Arc::new(EchoGenerator));
    let base = spawn_app(state).await;

    let body: Value = reqwest::Client::new()
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], json!("healthy"));
}
