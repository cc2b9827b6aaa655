//! Durable catalog storage for Ludex.
//!
//! The system of record is a single JSON index file (`games.json`,
//! read-all/write-all) plus one `info.json` manifest per game folder, a
//! denormalized mirror of the same record. The two writes are not
//! transactional: [`CatalogStore::upsert`] writes the manifest first (it is
//! per-key and collision-free), then the index, and surfaces whichever
//! layer failed. [`CatalogStore::reconcile`] detects drift between them.
//!
//! Index read-modify-write is serialized behind a per-process mutex, so
//! concurrent upserts to different ids cannot lose updates. Multi-process
//! deployment needs external locking and is out of scope.

use std::path::{Path, PathBuf};

use ludex_core::game::GameRecord;
use tokio::sync::Mutex;

/// Name of the catalog index file inside the data directory.
pub const INDEX_FILE: &str = "games.json";

/// Name of the per-game manifest file inside each game folder.
pub const MANIFEST_FILE: &str = "info.json";

/// Name of the directory holding all game folders.
pub const GAMES_DIR: &str = "games";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Game not found: {0}")]
    NotFound(String),

    #[error("Record is not storable: {0}")]
    InvalidRecord(String),

    #[error("Catalog index read failed: {0}")]
    IndexRead(String),

    #[error("Catalog index write failed: {0}")]
    IndexWrite(String),

    #[error("Catalog index is corrupt: {0}")]
    Corrupt(String),

    #[error("Manifest write failed for '{folder}': {message}")]
    Manifest { folder: String, message: String },

    #[error("Asset folder removal failed for '{folder}': {message}")]
    Assets { folder: String, message: String },
}

/// One detected inconsistency between the index and the on-disk manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogDrift {
    /// The index lists a game whose folder has no manifest file.
    MissingManifest { id: String, folder: String },
    /// A manifest exists but no longer matches the index entry.
    ManifestDiverged { id: String, folder: String },
    /// A game folder exists on disk with no corresponding index entry.
    OrphanFolder { folder: String },
}

/// Durable mapping from game id to [`GameRecord`].
#[derive(Debug)]
pub struct CatalogStore {
    games_dir: PathBuf,
    index_path: PathBuf,
    /// Serializes index read-modify-write across tasks.
    index_lock: Mutex<()>,
}

impl CatalogStore {
    /// Open (and if necessary initialize) a catalog rooted at `data_dir`.
    ///
    /// Creates `<data_dir>/games/` and an empty index if they do not exist.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let games_dir = data_dir.join(GAMES_DIR);
        let index_path = data_dir.join(INDEX_FILE);

        tokio::fs::create_dir_all(&games_dir)
            .await
            .map_err(|e| StoreError::IndexWrite(format!("creating games directory: {e}")))?;

        if tokio::fs::try_exists(&index_path)
            .await
            .map_err(|e| StoreError::IndexRead(e.to_string()))?
        {
            // Fail fast on an unreadable catalog rather than clobbering it later.
            let _ = read_index(&index_path).await?;
        } else {
            write_index(&index_path, &[]).await?;
            tracing::info!(path = %index_path.display(), "Initialized empty catalog index");
        }

        Ok(Self {
            games_dir,
            index_path,
            index_lock: Mutex::new(()),
        })
    }

    /// Directory containing all game folders.
    pub fn games_dir(&self) -> &Path {
        &self.games_dir
    }

    /// Absolute path of a game's asset folder.
    pub fn game_dir(&self, folder: &str) -> PathBuf {
        self.games_dir.join(folder)
    }

    /// Absolute path of a game's manifest file.
    pub fn manifest_path(&self, folder: &str) -> PathBuf {
        self.game_dir(folder).join(MANIFEST_FILE)
    }

    /// All records in catalog order.
    pub async fn all(&self) -> Result<Vec<GameRecord>, StoreError> {
        read_index(&self.index_path).await
    }

    /// Look up a single record by id.
    pub async fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.all().await?.into_iter().find(|g| g.id == id))
    }

    /// Insert or replace a record, keyed by `id`.
    ///
    /// Writes the per-game manifest first, then rewrites the index. Holding
    /// the index lock for both writes keeps a concurrent upsert from
    /// observing the manifest of a record the index does not yet have.
    pub async fn upsert(&self, record: &GameRecord) -> Result<(), StoreError> {
        validate_storable(record)?;

        let _guard = self.index_lock.lock().await;
        self.write_manifest(record).await?;

        let mut games = read_index(&self.index_path).await?;
        match games.iter_mut().find(|g| g.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => games.push(record.clone()),
        }
        write_index(&self.index_path, &games).await?;

        tracing::debug!(id = %record.id, folder = %record.folder, "Catalog upsert committed");
        Ok(())
    }

    /// Remove a record by id, optionally deleting its asset folder.
    ///
    /// Returns the removed record. The index is rewritten before any file
    /// deletion so a failed cascade never resurrects the entry.
    pub async fn remove(
        &self,
        id: &str,
        remove_files: bool,
    ) -> Result<GameRecord, StoreError> {
        let _guard = self.index_lock.lock().await;

        let mut games = read_index(&self.index_path).await?;
        let position = games
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = games.remove(position);
        write_index(&self.index_path, &games).await?;

        if remove_files && !removed.folder.is_empty() {
            let dir = self.game_dir(&removed.folder);
            if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(StoreError::Assets {
                        folder: removed.folder.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(id = %id, removed_files = remove_files, "Game removed from catalog");
        Ok(removed)
    }

    /// Detect drift between the index and the per-game manifests.
    ///
    /// Read-only: reports what it finds and mutates nothing, so it is safe
    /// to run against a live catalog.
    pub async fn reconcile(&self) -> Result<Vec<CatalogDrift>, StoreError> {
        let games = self.all().await?;
        let mut drift = Vec::new();

        for game in &games {
            let manifest_path = self.manifest_path(&game.folder);
            match tokio::fs::read(&manifest_path).await {
                Ok(bytes) => match serde_json::from_slice::<GameRecord>(&bytes) {
                    Ok(manifest) if manifest == *game => {}
                    _ => drift.push(CatalogDrift::ManifestDiverged {
                        id: game.id.clone(),
                        folder: game.folder.clone(),
                    }),
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    drift.push(CatalogDrift::MissingManifest {
                        id: game.id.clone(),
                        folder: game.folder.clone(),
                    });
                }
                Err(e) => {
                    return Err(StoreError::Manifest {
                        folder: game.folder.clone(),
                        message: e.to_string(),
                    })
                }
            }
        }

        let mut entries = tokio::fs::read_dir(&self.games_dir)
            .await
            .map_err(|e| StoreError::IndexRead(e.to_string()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::IndexRead(e.to_string()))?
        {
            if !entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let folder = entry.file_name().to_string_lossy().to_string();
            if !games.iter().any(|g| g.folder == folder) {
                drift.push(CatalogDrift::OrphanFolder { folder });
            }
        }

        Ok(drift)
    }

    /// Write a record's manifest mirror into its game folder.
    async fn write_manifest(&self, record: &GameRecord) -> Result<(), StoreError> {
        let manifest_err = |message: String| StoreError::Manifest {
            folder: record.folder.clone(),
            message,
        };

        tokio::fs::create_dir_all(self.game_dir(&record.folder))
            .await
            .map_err(|e| manifest_err(e.to_string()))?;

        let json = serde_json::to_vec_pretty(record).map_err(|e| manifest_err(e.to_string()))?;
        tokio::fs::write(self.manifest_path(&record.folder), json)
            .await
            .map_err(|e| manifest_err(e.to_string()))
    }
}

fn validate_storable(record: &GameRecord) -> Result<(), StoreError> {
    if record.id.is_empty() {
        return Err(StoreError::InvalidRecord("record has no id".to_string()));
    }
    if record.folder.is_empty() {
        return Err(StoreError::InvalidRecord(format!(
            "record '{}' has no folder",
            record.id
        )));
    }
    if !ludex_core::paths::is_safe_relative_path(&record.folder) || record.folder.contains('/') {
        return Err(StoreError::InvalidRecord(format!(
            "record '{}' has an unsafe folder name '{}'",
            record.id, record.folder
        )));
    }
    // Every stored asset reference must stay inside the game folder,
    // whatever path the client sent in an update body.
    if let Some(bad) = record
        .screenshots
        .iter()
        .find(|s| !ludex_core::paths::is_safe_relative_path(s))
    {
        return Err(StoreError::InvalidRecord(format!(
            "record '{}' has an unsafe screenshot path '{bad}'",
            record.id
        )));
    }
    if let Some(bad) = record
        .download_files
        .iter()
        .find(|f| f.filename.contains(['/', '\\']) || !ludex_core::paths::is_safe_relative_path(&f.filename))
    {
        return Err(StoreError::InvalidRecord(format!(
            "record '{}' has an unsafe download filename '{}'",
            record.id, bad.filename
        )));
    }
    if !record.trailer_url.is_empty()
        && !ludex_core::paths::is_safe_relative_path(&record.trailer_url)
    {
        return Err(StoreError::InvalidRecord(format!(
            "record '{}' has an unsafe trailer path '{}'",
            record.id, record.trailer_url
        )));
    }
    Ok(())
}

async fn read_index(path: &Path) -> Result<Vec<GameRecord>, StoreError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| StoreError::IndexRead(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Rewrite the whole index. Written to a sibling temp file and renamed so
/// a crash mid-write cannot leave a torn index behind.
async fn write_index(path: &Path, games: &[GameRecord]) -> Result<(), StoreError> {
    let json =
        serde_json::to_vec_pretty(games).map_err(|e| StoreError::IndexWrite(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| StoreError::IndexWrite(e.to_string()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::IndexWrite(e.to_string()))
}
