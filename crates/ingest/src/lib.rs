//! The asset-ingestion pipeline.
//!
//! Turns a storefront app id into a committed [`ludex_core::game::GameRecord`]
//! with locally stored media: [`layout`] defines the on-disk shape of a game
//! folder, [`orchestrator`] coordinates normalization, concurrent asset
//! fetches, and the final catalog commit.

pub mod layout;
pub mod orchestrator;

pub use orchestrator::{IngestError, IngestOutcome, Ingestor};
