//! Storefront integration for Ludex.
//!
//! [`client::StorefrontClient`] talks to the third-party metadata API;
//! [`fetch::AssetFetcher`] streams remote media to local storage with
//! settled (never-throw) outcomes.

pub mod client;
pub mod fetch;
