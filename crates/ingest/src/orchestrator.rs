//! Ingestion orchestration.
//!
//! One [`Ingestor::ingest`] call takes a storefront app id to a fully
//! committed catalog entry: re-fetch authoritative metadata, normalize,
//! fan out every asset download concurrently, wait for all of them to
//! settle, then commit manifest and index. Individual asset failures are
//! absorbed into the returned report; only an unreachable storefront, an
//! unknown app, directory creation, or the final commit can fail the run.

use std::sync::Arc;

use futures::future::join_all;
use ludex_core::error::CoreError;
use ludex_core::game::{merge_update, GameRecord};
use ludex_core::naming::sanitize_folder_name;
use ludex_core::normalize::{normalize, MAX_SCREENSHOTS};
use ludex_core::rewrite::rewrite_description;
use ludex_steam::client::{SteamError, StorefrontClient};
use ludex_steam::fetch::{AssetFetcher, AssetReport, FetchOutcome};
use ludex_store::{CatalogStore, StoreError};

use crate::layout::GameLayout;

/// Override keys that are never taken from the client. Asset source URLs
/// and the screenshot plan always come from the re-fetched storefront
/// document, so a stale or tampered client copy cannot redirect downloads.
const PROTECTED_OVERRIDE_KEYS: &[&str] = &[
    "headerImageUrl",
    "capsuleImageUrl",
    "trailerUrl",
    "screenshots",
];

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Storefront has no app with id {0}")]
    UnknownApp(String),

    #[error(transparent)]
    Upstream(#[from] SteamError),

    #[error("Failed to prepare game directories: {0}")]
    Layout(#[source] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Result of a completed ingestion run.
#[derive(Debug)]
pub struct IngestOutcome {
    pub game: GameRecord,
    /// One report per scheduled asset, in scheduling order.
    pub assets: Vec<AssetReport>,
}

impl IngestOutcome {
    pub fn downloaded_count(&self) -> usize {
        self.assets
            .iter()
            .filter(|a| a.outcome.is_downloaded())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.assets.iter().filter(|a| a.outcome.is_failed()).count()
    }
}

/// Coordinates the ingestion pipeline over the store, the storefront
/// client, and the asset fetcher.
pub struct Ingestor {
    store: Arc<CatalogStore>,
    steam: Arc<StorefrontClient>,
    fetcher: Arc<AssetFetcher>,
}

/// One scheduled download: label, source URL, destination path.
struct PlannedFetch {
    label: String,
    url: String,
    dest: std::path::PathBuf,
}

impl Ingestor {
    pub fn new(
        store: Arc<CatalogStore>,
        steam: Arc<StorefrontClient>,
        fetcher: Arc<AssetFetcher>,
    ) -> Self {
        Self {
            store,
            steam,
            fetcher,
        }
    }

    /// Ingest one storefront app into the catalog.
    ///
    /// `overrides` is an optional client-supplied partial record merged
    /// over the normalized document for presentation fields; asset source
    /// URLs in it are ignored (see [`PROTECTED_OVERRIDE_KEYS`]).
    /// Re-ingesting an id that is already cataloged replaces the record
    /// and reuses its existing folder.
    pub async fn ingest(
        &self,
        app_id: &str,
        overrides: Option<serde_json::Value>,
    ) -> Result<IngestOutcome, IngestError> {
        // Authoritative metadata; client copies are never trusted for URLs.
        let raw = self
            .steam
            .fetch_app(app_id)
            .await?
            .ok_or_else(|| IngestError::UnknownApp(app_id.to_string()))?;

        let mut record = normalize(&raw, app_id);

        if let Some(mut patch) = overrides {
            if let Some(map) = patch.as_object_mut() {
                for key in PROTECTED_OVERRIDE_KEYS {
                    map.remove(*key);
                }
            }
            record = merge_update(&record, patch)?;
        }

        record.folder = match self.store.get(&record.id).await? {
            // Folder is immutable once assigned; later renames must not
            // orphan assets already on disk.
            Some(existing) => existing.folder,
            None => self.assign_folder(&record).await?,
        };

        let layout = GameLayout::new(self.store.games_dir(), &record.folder);
        layout.ensure().await.map_err(IngestError::Layout)?;

        let plan = self.plan_fetches(&mut record, &raw, &layout);
        tracing::info!(
            app_id,
            id = %record.id,
            folder = %record.folder,
            scheduled = plan.len(),
            "Starting asset downloads"
        );

        // Fan out and wait for every fetch to settle before committing;
        // nothing downstream may observe a partially attempted set.
        let assets = join_all(plan.into_iter().map(|fetch| async move {
            AssetReport {
                outcome: self.fetcher.fetch(&fetch.url, &fetch.dest).await,
                label: fetch.label,
            }
        }))
        .await;

        self.store.upsert(&record).await?;

        let outcome = IngestOutcome {
            game: record,
            assets,
        };
        tracing::info!(
            app_id,
            id = %outcome.game.id,
            downloaded = outcome.downloaded_count(),
            failed = outcome.failed_count(),
            "Ingestion committed"
        );
        Ok(outcome)
    }

    /// Pick the folder for a record entering the catalog.
    ///
    /// Starts from the sanitized name (falling back to the id for names
    /// that sanitize to nothing) and disambiguates against folders other
    /// records already own. Two games whose names slug identically must
    /// never share a folder: they would overwrite each other's manifest,
    /// and a cascading delete of one would take the other's assets.
    async fn assign_folder(&self, record: &GameRecord) -> Result<String, IngestError> {
        let slug = sanitize_folder_name(&record.name);
        let base = if slug.is_empty() {
            record.id.clone()
        } else {
            slug
        };

        let games = self.store.all().await?;
        let taken = |candidate: &str| {
            games
                .iter()
                .any(|g| g.folder == candidate && g.id != record.id)
        };

        if !taken(&base) {
            return Ok(base);
        }

        let mut candidate = format!("{base}-{}", record.steam_app_id);
        let mut n = 2;
        while taken(&candidate) {
            candidate = format!("{base}-{}-{n}", record.steam_app_id);
            n += 1;
        }
        tracing::info!(
            id = %record.id,
            folder = %candidate,
            "Folder slug already owned by another game; disambiguated"
        );
        Ok(candidate)
    }

    /// Build the full download plan and apply the matching local-path
    /// rewrites to the record.
    ///
    /// After this returns, the record references only local paths; the
    /// fetches that make them real are in the returned plan.
    fn plan_fetches(
        &self,
        record: &mut GameRecord,
        raw: &serde_json::Value,
        layout: &GameLayout,
    ) -> Vec<PlannedFetch> {
        let mut plan = Vec::new();

        // Boxart and banner are two local copies of the same header image.
        if !record.header_image_url.is_empty() {
            plan.push(PlannedFetch {
                label: "boxart".to_string(),
                url: record.header_image_url.clone(),
                dest: layout.boxart_path(),
            });
            plan.push(PlannedFetch {
                label: "banner".to_string(),
                url: record.header_image_url.clone(),
                dest: layout.banner_path(),
            });
        }

        if !record.trailer_url.is_empty() {
            plan.push(PlannedFetch {
                label: "trailer".to_string(),
                url: record.trailer_url.clone(),
                dest: layout.trailer_path(),
            });
            record.trailer_url = layout.web_trailer_path();
        }

        let rewritten = rewrite_description(&record.description, &record.folder);
        record.description = rewritten.content;
        for image in rewritten.images {
            plan.push(PlannedFetch {
                label: image.filename.clone(),
                dest: layout.description_image_path(&image.filename),
                url: image.url,
            });
        }

        // Screenshot sources come from the re-fetched document only. Names
        // are positional and survive individual fetch failures.
        let screenshot_urls: Vec<String> = raw
            .get("screenshots")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .take(MAX_SCREENSHOTS)
                    .map(|e| {
                        e.get("path_full")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect()
            })
            .unwrap_or_default();

        record.screenshots = (1..=screenshot_urls.len())
            .map(|i| format!("screenshot{i}.jpg"))
            .collect();

        for (index, url) in screenshot_urls.into_iter().enumerate() {
            let filename = &record.screenshots[index];
            plan.push(PlannedFetch {
                label: format!("screenshot{}", index + 1),
                dest: layout.screenshot_path(filename),
                url,
            });
        }

        plan
    }
}
