use async_trait::async_trait;
use rig::agent::Agent;
use rig::completion::Prompt;
use rig::providers::gemini;
use rig::providers::gemini::completion::CompletionModel;
use thiserror::Error;
use tracing::{info, instrument};

use crate::metrics::{inc_generation_error, inc_generation_success};

const GEMINI_MODEL: &str = "gemini-1.5-flash";

const PREAMBLE: &str =
    "You are a helpful travel planning assistant that creates detailed itineraries and answers follow-up questions about them.";

/// Failures from one generation call. `MissingApiKey` mentions "API key" in
/// its display so the handler-side credential hint fires on it.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key: GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Completion failed: {0}")]
    Completion(String),
}

/// Seam between the handlers and the model provider; tests substitute a stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Gemini-backed generator. Built once at startup; without a key it holds no
/// agent and every call fails with `MissingApiKey`, surfaced to the client as
/// a structured error while the server keeps running.
pub struct GeminiGenerator {
    agent: Option<Agent<CompletionModel>>,
}

impl GeminiGenerator {
    pub fn new(api_key: Option<&str>) -> Self {
        let agent = api_key.map(|key| {
            gemini::Client::new(key)
                .agent(GEMINI_MODEL)
                .preamble(PREAMBLE)
                .build()
        });
        Self { agent }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    #[instrument(name = "generate_text", skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let agent = self.agent.as_ref().ok_or_else(|| {
            inc_generation_error();
            LlmError::MissingApiKey
        })?;

        info!("sending prompt of {} characters to {}", prompt.len(), GEMINI_MODEL);
        match agent.prompt(prompt).await {
            Ok(text) => {
                info!("received generated text");
                inc_generation_success();
                Ok(text)
            }
            Err(e) => {
                inc_generation_error();
                Err(LlmError::Completion(e.to_string()))
            }
        }
    }
}
