//! The text-generation capability shared by every backend.
//!
//! Callers hold an `Arc<dyn TextGenerator>` picked once at startup by
//! [`build_generator`] and never branch on which backend is behind it.

use crate::config::{Backend, Config};
use crate::error::{Result, TripPlannerError};
use crate::llm::hosted::HostedClient;
use crate::llm::local::LocalClient;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of one generation call.
///
/// Failures carry a human-readable message meant to be shown in place of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum GenerationResult {
    /// Generated markdown text.
    Text(String),
    /// Diagnostic for the end user.
    Failed(String),
}

impl GenerationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, GenerationResult::Text(_))
    }

    /// The text to display: the plan on success, the error message otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            GenerationResult::Text(text) | GenerationResult::Failed(text) => text,
        }
    }

    pub fn into_result(self) -> std::result::Result<String, String> {
        match self {
            GenerationResult::Text(text) => Ok(text),
            GenerationResult::Failed(message) => Err(message),
        }
    }
}

/// A backend that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Run one request, reporting failures as typed errors.
    async fn try_generate(&self, prompt: &str) -> Result<String>;

    /// Message shown to the user when [`TextGenerator::try_generate`] fails.
    fn describe_error(&self, err: &TripPlannerError) -> String;

    /// Run one request and fold every failure into [`GenerationResult::Failed`].
    async fn generate(&self, prompt: &str) -> GenerationResult {
        let start = Instant::now();
        match self.try_generate(prompt).await {
            Ok(text) => {
                info!(
                    backend = self.name(),
                    model = self.model(),
                    chars = text.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "generation finished"
                );
                GenerationResult::Text(text)
            }
            Err(err) => {
                warn!(
                    backend = self.name(),
                    model = self.model(),
                    error = %err,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "generation failed"
                );
                GenerationResult::Failed(self.describe_error(&err))
            }
        }
    }
}

/// Build the generator selected by the configuration.
pub fn build_generator(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match config.backend {
        Backend::Hosted => Arc::new(HostedClient::new(
            config.hosted.clone(),
            config.generation.clone(),
        )?),
        Backend::Local => Arc::new(LocalClient::new(
            config.local.clone(),
            config.generation.clone(),
        )?),
    };
    info!(
        backend = generator.name(),
        model = generator.model(),
        "text generator ready"
    );
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubGenerator {
        outcome: std::result::Result<String, String>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }

        async fn try_generate(&self, _prompt: &str) -> Result<String> {
            self.outcome.clone().map_err(TripPlannerError::Http)
        }

        fn describe_error(&self, err: &TripPlannerError) -> String {
            format!("stub failed: {}", err)
        }
    }

    #[tokio::test]
    async fn test_generate_wraps_success() {
        let stub = StubGenerator {
            outcome: Ok("# Plan".to_string()),
        };
        let result = stub.generate("prompt").await;
        assert_eq!(result, GenerationResult::Text("# Plan".to_string()));
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_generate_absorbs_errors() {
        let stub = StubGenerator {
            outcome: Err("connection refused".to_string()),
        };
        let result = stub.generate("prompt").await;
        assert!(!result.is_ok());
        assert_eq!(
            result.as_str(),
            "stub failed: HTTP request failed: connection refused"
        );
    }

    #[test]
    fn test_build_generator_follows_backend() {
        let hosted = Config::with_hosted("https://api.example.com", "key", "gemini-pro");
        assert_eq!(build_generator(&hosted).unwrap().name(), "hosted");

        let local = Config::with_local("http://localhost:11434/api/generate", "llama3");
        let generator = build_generator(&local).unwrap();
        assert_eq!(generator.name(), "local");
        assert_eq!(generator.model(), "llama3");
    }

    #[test]
    fn test_result_serialization() {
        let json = serde_json::to_value(GenerationResult::Failed("boom".to_string())).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["text"], "boom");
    }
}
