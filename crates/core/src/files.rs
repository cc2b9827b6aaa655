//! Download file classification and record bookkeeping.

use serde::{Deserialize, Serialize};

/// Extensions classified as installable applications.
pub const APPLICATION_EXTENSIONS: &[&str] = &["exe", "msi", "dmg", "app"];
/// Extensions classified as archives.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz"];
/// Extensions classified as documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf"];

/// Broad category of a downloadable file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Application,
    Archive,
    Document,
    Unknown,
}

/// One user-downloadable file attached to a game.
///
/// `filename` is the on-disk name at the game folder root and the unique
/// key within a record's `downloadFiles` list. `name` is the display label,
/// which survives re-uploads of the same filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadFile {
    pub name: String,
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

/// Classify a filename by its extension (case-insensitive).
pub fn classify_file(filename: &str) -> FileKind {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if APPLICATION_EXTENSIONS.contains(&extension.as_str()) {
        FileKind::Application
    } else if ARCHIVE_EXTENSIONS.contains(&extension.as_str()) {
        FileKind::Archive
    } else if DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
        FileKind::Document
    } else {
        FileKind::Unknown
    }
}

/// Insert or replace a download file entry, keyed by `filename`.
///
/// Re-uploading an existing filename replaces its size and kind in place
/// (keeping the established display name and list position) rather than
/// appending a duplicate.
pub fn upsert_download_file(files: &mut Vec<DownloadFile>, entry: DownloadFile) {
    match files.iter_mut().find(|f| f.filename == entry.filename) {
        Some(existing) => {
            existing.size = entry.size;
            existing.kind = entry.kind;
            if existing.name.is_empty() {
                existing.name = entry.name;
            }
        }
        None => files.push(entry),
    }
}
