//! Client lifecycle.
//!
//! A [`GenAiClient`] owns the provider connection, the model id and the retry
//! policy. Build one with [`GenAiClientBuilder`] and hand it to whoever needs
//! it; [`shared`] memoizes a single process-wide instance for the outermost
//! wiring only.

pub mod builder;
pub mod core;
mod shared;

pub use builder::GenAiClientBuilder;
pub use core::GenAiClient;
pub use shared::{shared, ClientCell};
