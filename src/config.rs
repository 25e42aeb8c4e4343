use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Process configuration, read from the environment once at startup.
///
/// Both API keys are optional: a missing `SERP_API_KEY` makes every flight
/// lookup degrade softly, a missing `GEMINI_API_KEY` makes generation calls
/// fail with a surfaced error while the server itself keeps running.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub serp_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            serp_api_key: non_empty_var("SERP_API_KEY"),
        }
    }
}

/// Treats a set-but-blank variable the same as an unset one.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
