//! Trip Planner - An LLM-powered travel itinerary generator.
//!
//! Collects trip preferences (destination, duration, travel style, interests),
//! turns them into a single natural-language prompt, sends it to a
//! text-generation backend and renders the returned markdown next to booking,
//! map and affiliate widget links.
//!
//! # Quick Start
//!
//! ```no_run
//! use trip_planner::{
//!     config::Config,
//!     llm::{build_generator, Prompts, TextGenerator},
//!     trip::{Month, TravelStyle, TripRequest},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     // Pick the backend once
//!     let generator = build_generator(&config)?;
//!
//!     let request = TripRequest::new("Goa", "India")
//!         .with_days(5)
//!         .with_style(TravelStyle::Budget)
//!         .with_month(Month::December);
//!     request.validate()?;
//!
//!     let result = generator.generate(&Prompts::trip_plan(&request)).await;
//!     println!("{}", result.as_str());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **TripRequest**: Validated trip preferences from one form submission
//! - **Prompts**: Deterministic prompt construction
//! - **TextGenerator**: Backend capability, hosted (Gemini) or local (Ollama)
//! - **links**: Booking, map and affiliate widget URLs
//! - **render**: Markdown and page rendering
//! - **server**: Axum web form and JSON API

pub mod catalog;
pub mod config;
pub mod error;
pub mod links;
pub mod llm;
pub mod render;
pub mod server;
pub mod trip;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TripPlannerError};
pub use links::{BookingLinks, booking_links};
pub use llm::{GenerationResult, Prompts, TextGenerator, build_generator};
pub use trip::{Month, TravelStyle, TripRequest};
