//! HTTP surface of the Ludex game portal.
//!
//! Exposed as a library so integration tests build the exact same router
//! and middleware stack as the production binary.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
