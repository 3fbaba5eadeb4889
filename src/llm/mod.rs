//! LLM integration module.
//!
//! Provides the [`TextGenerator`] capability with a hosted (Gemini) and a
//! local (Ollama-compatible) backend, and the prompts used for trip planning.

mod client;
mod hosted;
mod local;
mod prompts;
pub mod stream;

pub use client::{GenerationResult, TextGenerator, build_generator};
pub use hosted::HostedClient;
pub use local::{LocalClient, NO_VALID_RESPONSE};
pub use prompts::Prompts;
