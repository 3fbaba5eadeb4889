//! Local inference server client (Ollama generate API).
//!
//! The server streams newline-delimited JSON; see [`crate::llm::stream`].

use crate::config::{GenerationConfig, LocalConfig};
use crate::error::{Result, TripPlannerError};
use crate::llm::client::TextGenerator;
use crate::llm::stream::{collect_text, fragments};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Message shown when the stream finished without any usable text.
pub const NO_VALID_RESPONSE: &str = "❌ No valid response from local model.";

/// Request body for a generate call.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    max_output_tokens: u32,
}

/// Client for a local model server.
#[derive(Clone)]
pub struct LocalClient {
    client: Client,
    config: LocalConfig,
    generation: GenerationConfig,
}

impl LocalClient {
    /// Create a new client; the request timeout comes from `generation.timeout_secs`.
    pub fn new(config: LocalConfig, generation: GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(generation.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            generation,
        })
    }
}

#[async_trait]
impl TextGenerator for LocalClient {
    fn name(&self) -> &'static str {
        "local"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn try_generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            options: GenerateOptions {
                temperature: self.generation.temperature,
                max_output_tokens: self.generation.max_tokens,
            },
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TripPlannerError::LlmApi(format!(
                "Request failed ({}): {}",
                status, body
            )));
        }

        collect_text(fragments(Box::pin(response.bytes_stream()))).await
    }

    fn describe_error(&self, err: &TripPlannerError) -> String {
        match err {
            TripPlannerError::EmptyResponse(_) => NO_VALID_RESPONSE.to_string(),
            other => format!("❌ Error contacting local model server: {}", other),
        }
    }
}
