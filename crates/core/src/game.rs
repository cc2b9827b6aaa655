//! The canonical catalog entity and its nested types.
//!
//! `GameRecord` is the wire format of both the catalog index (`games.json`)
//! and each per-game manifest (`info.json`). Fields use camelCase on the
//! wire to stay compatible with catalogs written by earlier versions of the
//! portal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::files::DownloadFile;

/// A single game in the catalog.
///
/// Created by ingestion (`id` is derived as `game-<steamAppId>` and never
/// regenerated), mutated by update and file-upload requests. `folder` is
/// assigned once and then immutable; changing it would orphan the assets
/// already stored under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameRecord {
    pub id: String,
    pub folder: String,
    pub name: String,
    pub steam_app_id: String,
    /// Rich-text description; after ingestion all embedded image references
    /// point at local copies under `description-images/`.
    pub description: String,
    pub short_description: String,
    pub instructions: String,
    /// Primary genre (first entry of `genres`, or `"Unknown"`).
    pub genre: String,
    pub genres: Vec<String>,
    pub categories: Vec<String>,
    /// `"1"` or `"2+"`, derived from multiplayer category markers.
    pub players: String,
    pub is_multiplayer: bool,
    /// Opaque storefront-supplied date string, may be empty.
    pub release_date: String,
    pub developers: Vec<String>,
    /// First developer, kept denormalized for display.
    pub studio: String,
    pub publishers: Vec<String>,
    pub publisher: String,
    pub version: String,
    /// Estimated install size in bytes, `None` when unknown.
    pub file_size: Option<u64>,
    pub price: String,
    pub discount_percent: u32,
    pub recommendations: u64,
    pub recommendation_percent: u32,
    pub system_requirements: SystemRequirements,
    pub legal_notice: String,
    pub supported_languages: String,
    pub download_files: Vec<DownloadFile>,
    /// Local filenames under `screenshots/`, capped at 10, index-aligned
    /// with fetch order. Never remote URLs.
    pub screenshots: Vec<String>,
    /// Remote source for boxart/banner; retained for re-ingestion.
    pub header_image_url: String,
    pub capsule_image_url: String,
    /// Empty, a local relative path, or (only before ingestion commits) a
    /// remote URL.
    pub trailer_url: String,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            folder: String::new(),
            name: String::new(),
            steam_app_id: String::new(),
            description: String::new(),
            short_description: String::new(),
            instructions: String::new(),
            genre: "Unknown".to_string(),
            genres: Vec::new(),
            categories: Vec::new(),
            players: "1".to_string(),
            is_multiplayer: false,
            release_date: String::new(),
            developers: Vec::new(),
            studio: String::new(),
            publishers: Vec::new(),
            publisher: String::new(),
            version: "1.0.0".to_string(),
            file_size: None,
            price: "Unknown".to_string(),
            discount_percent: 0,
            recommendations: 0,
            recommendation_percent: 0,
            system_requirements: SystemRequirements::default(),
            legal_notice: String::new(),
            supported_languages: String::new(),
            download_files: Vec::new(),
            screenshots: Vec::new(),
            header_image_url: String::new(),
            capsule_image_url: String::new(),
            trailer_url: String::new(),
        }
    }
}

/// PC system requirements extracted from storefront markup.
///
/// Every field keeps a generic default when the storefront supplies no
/// labelled value, so the UI never renders a blank row for a game that
/// simply has no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemRequirements {
    pub os: String,
    pub processor: String,
    pub memory: String,
    pub graphics: String,
    pub storage: String,
}

impl Default for SystemRequirements {
    fn default() -> Self {
        Self {
            os: "Windows 10 64-bit".to_string(),
            processor: "Intel Core i3-7100 or AMD Ryzen 3 1200".to_string(),
            memory: "8 GB RAM".to_string(),
            graphics: "NVIDIA GeForce GTX 960 or AMD Radeon RX 5500 XT".to_string(),
            storage: "75 GB available space".to_string(),
        }
    }
}

/// Shallow-merge a partial update onto an existing record.
///
/// Mirrors the update endpoint's contract: every top-level key present in
/// `patch` replaces the corresponding field wholesale. `id` and `folder`
/// are immutable and always taken from `existing`, whatever the patch says.
pub fn merge_update(
    existing: &GameRecord,
    patch: serde_json::Value,
) -> Result<GameRecord, CoreError> {
    let serde_json::Value::Object(patch) = patch else {
        return Err(CoreError::Validation(
            "Update body must be a JSON object".to_string(),
        ));
    };

    let mut merged = match serde_json::to_value(existing) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => {
            return Err(CoreError::Internal(
                "Record did not serialize to an object".to_string(),
            ))
        }
    };

    for (key, value) in patch {
        merged.insert(key, value);
    }
    merged.insert(
        "id".to_string(),
        serde_json::Value::String(existing.id.clone()),
    );
    merged.insert(
        "folder".to_string(),
        serde_json::Value::String(existing.folder.clone()),
    );

    serde_json::from_value(serde_json::Value::Object(merged))
        .map_err(|e| CoreError::Validation(format!("Invalid update payload: {e}")))
}
