//! Domain types and pure catalog logic for Ludex.
//!
//! Everything in this crate is side-effect free: record types, the folder
//! name sanitizer, the storefront document normalizer, the description
//! image rewriter, and the shared error taxonomy. I/O lives in the
//! `ludex-store`, `ludex-steam`, and `ludex-ingest` crates.

pub mod error;
pub mod files;
pub mod game;
pub mod naming;
pub mod normalize;
pub mod paths;
pub mod rewrite;
