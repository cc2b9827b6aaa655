//! Streaming asset downloads with settled outcomes.
//!
//! Every fetch concludes in a [`FetchOutcome`]; nothing here returns `Err`.
//! One asset failing must never abort its siblings, so network and storage
//! errors are folded into `Failed` and logged, and the orchestrator decides
//! what a failure means for the record. Bodies are streamed chunk by chunk
//! to disk; a multi-gigabyte trailer never lives in memory.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

/// Terminal state of one asset fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No URL was supplied; nothing to do.
    Skipped,
    /// The asset was fully written to its destination.
    Downloaded { bytes: u64 },
    /// The attempt concluded in an error. A partial file may remain on
    /// disk; the record must not reference it.
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn is_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }
}

/// Report for one asset within an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReport {
    /// What the asset is, e.g. `boxart`, `screenshot3`, `description-image-1`.
    pub label: String,
    pub outcome: FetchOutcome,
}

/// Downloads remote assets to local files.
pub struct AssetFetcher {
    client: reqwest::Client,
}

impl AssetFetcher {
    /// Create a fetcher whose requests are bounded by `timeout`.
    ///
    /// The timeout covers the whole transfer; an asset that cannot finish
    /// in time settles as `Failed`, like any other error.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Stream `url` into the file at `dest`.
    ///
    /// An empty URL short-circuits to [`FetchOutcome::Skipped`]. All other
    /// failure modes (HTTP status, transfer, disk) settle as `Failed`.
    pub async fn fetch(&self, url: &str, dest: &Path) -> FetchOutcome {
        if url.is_empty() {
            return FetchOutcome::Skipped;
        }

        match self.try_fetch(url, dest).await {
            Ok(bytes) => {
                tracing::debug!(url, dest = %dest.display(), bytes, "Asset downloaded");
                FetchOutcome::Downloaded { bytes }
            }
            Err(reason) => {
                tracing::warn!(url, dest = %dest.display(), %reason, "Asset fetch failed");
                FetchOutcome::Failed { reason }
            }
        }
    }

    async fn try_fetch(&self, url: &str, dest: &Path) -> Result<u64, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| format!("creating {}: {e}", dest.display()))?;

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| e.to_string())?;
            file.write_all(&chunk)
                .await
                .map_err(|e| format!("writing {}: {e}", dest.display()))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| format!("flushing {}: {e}", dest.display()))?;
        Ok(written)
    }
}
