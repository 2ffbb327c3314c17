//! # tripgen
//!
//! Resilient structured generation for a travel planner.
//!
//! The crate sits between a travel application and Google Gemini. It turns a
//! natural-language request into a validated, typed result and guarantees
//! that every failure leaving the crate is one of a small, closed set of
//! classified errors with a user-safe message.
//!
//! ## Overview
//!
//! - **Client lifecycle**: [`GenAiClient`] owns the provider connection, model
//!   and retry policy; build one with [`GenAiClientBuilder`] and share it via `Arc`.
//! - **Retry**: [`retry::with_retry`] retries rate-limited calls with
//!   exponential backoff and honours cancellation.
//! - **Classification**: [`classify::classify`] maps raw
//!   [`TransportFailure`]s onto [`ErrorKind`]s.
//! - **Two-phase pipeline**: [`GenerationPipeline`] runs an optional web-grounded
//!   pass, then a schema-constrained formatting pass, then parses, validates
//!   and reattaches grounding sources.
//! - **Operations**: [`TravelPlanner`] exposes itinerary, packing checklist,
//!   price quote, destination ideas, travel advisory and phrase sheet.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use tripgen::{ClientConfig, GenAiClient, ItineraryParams, TravelPlanner};
//!
//! #[tokio::main]
//! async fn main() -> tripgen::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let client = Arc::new(GenAiClient::from_config(&config)?);
//!     let planner = TravelPlanner::new(client);
//!
//!     let mut params = ItineraryParams::new("Lisbon", 3);
//!     params.interests = vec!["food".into(), "azulejos".into()];
//!
//!     let itinerary = planner
//!         .generate_itinerary(&params, &CancellationToken::new())
//!         .await?;
//!     println!("{} days, {} sources", itinerary.days.len(), itinerary.sources.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client handle, builder and process-wide cell |
//! | [`config`] | Defaults, YAML file and environment configuration |
//! | [`retry`] | Bounded exponential backoff for rate limits |
//! | [`classify`] | Raw failure to classified error |
//! | [`pipeline`] | Two-phase structured generation |
//! | [`structured`] | Static schemas, JSON extraction and validation |
//! | [`provider`] | Model provider trait and the Gemini implementation |
//! | [`transport`] | HTTP transport and raw failures |
//! | [`operations`] | Travel operations and their schemas |

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod error_code;
pub mod operations;
pub mod pipeline;
pub mod provider;
pub mod retry;
pub mod structured;
pub mod transport;

pub use client::{shared, ClientCell, GenAiClient, GenAiClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, ErrorContext};
pub use error_code::ErrorKind;
pub use operations::{
    AdvisoryParams, ChecklistParams, DestinationParams, DestinationSuggestions, Itinerary,
    ItineraryParams, PackingChecklist, PhraseSheet, PhraseSheetParams, PriceQuote,
    PriceQuoteParams, TravelAdvisory, TravelPlanner,
};
pub use pipeline::{GenerationPipeline, OperationRequest, PipelineStage, StructuredGeneration};
pub use provider::{GenerateRequest, GroundingSource, ModelProvider, RawGeneration};
pub use retry::RetryPolicy;
pub use transport::TransportFailure;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
