//! Cross-module tests for the possession pipeline.
//!
//! - `scenarios.rs`: end-to-end ticks for each catch situation
//! - `determinism.rs`: same seed and same inputs give the same ticks
//! - `properties.rs`: invariants checked over generated courts
//! - `helpers.rs`: court builders and tracing setup

mod helpers;
mod properties;

pub use helpers::*;
