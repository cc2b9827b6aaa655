//! REST client for the storefront metadata API.
//!
//! The storefront answers appdetails-style queries with a JSON envelope
//! keyed by app id: `{ "<appId>": { "success": bool, "data": { ... } } }`.
//! [`StorefrontClient::fetch_app`] unwraps that envelope and returns the
//! inner `data` document, or `None` when the storefront reports no match.

use std::time::Duration;

/// Errors from the storefront API layer.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Storefront request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storefront returned a non-2xx status code.
    #[error("Storefront API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response was 2xx but not the expected envelope shape.
    #[error("Malformed storefront response: {0}")]
    Malformed(String),
}

/// HTTP client for the storefront metadata API.
pub struct StorefrontClient {
    client: reqwest::Client,
    api_url: String,
}

impl StorefrontClient {
    /// Create a client for the storefront at `api_url`.
    ///
    /// Requests are bounded by `timeout`; a timed-out metadata fetch is a
    /// hard upstream failure, unlike asset fetches.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, SteamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Base URL of the storefront API.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the metadata document for one app id.
    ///
    /// Returns `Ok(None)` when the storefront answers but reports no match
    /// (`success: false` or a missing entry); that is the caller's 404, not
    /// an upstream failure.
    pub async fn fetch_app(
        &self,
        app_id: &str,
    ) -> Result<Option<serde_json::Value>, SteamError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("appids", app_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SteamError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: serde_json::Value = response.json().await?;
        let Some(entry) = envelope.get(app_id) else {
            return Ok(None);
        };

        if !entry
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            return Ok(None);
        }

        match entry.get("data") {
            Some(data) if data.is_object() => Ok(Some(data.clone())),
            _ => Err(SteamError::Malformed(format!(
                "entry for app {app_id} has success=true but no data object"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Envelope handling is covered end-to-end (with a live mock storefront)
    // in the ingest crate's integration tests; these exercise construction.

    #[test]
    fn client_builds_with_timeout() {
        let client = StorefrontClient::new("http://localhost:1", Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_url(), "http://localhost:1");
    }
}
