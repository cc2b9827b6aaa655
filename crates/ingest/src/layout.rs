//! On-disk layout of one game folder.
//!
//! ```text
//! <games_dir>/<folder>/
//!   info.json                               manifest (written by the store)
//!   boxart.jpg
//!   banner.jpg
//!   trailer.webm                            optional
//!   screenshots/screenshot<N>.jpg
//!   description-images/description-image-<N>.jpg
//!   <uploaded files>                        at the folder root
//! ```

use std::path::{Path, PathBuf};

pub const BOXART_FILE: &str = "boxart.jpg";
pub const BANNER_FILE: &str = "banner.jpg";
pub const TRAILER_FILE: &str = "trailer.webm";
pub const SCREENSHOTS_DIR: &str = "screenshots";
pub const DESCRIPTION_IMAGES_DIR: &str = "description-images";

/// Resolved paths for one game's asset folder.
pub struct GameLayout {
    folder: String,
    root: PathBuf,
}

impl GameLayout {
    pub fn new(games_dir: &Path, folder: &str) -> Self {
        Self {
            folder: folder.to_string(),
            root: games_dir.join(folder),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn boxart_path(&self) -> PathBuf {
        self.root.join(BOXART_FILE)
    }

    pub fn banner_path(&self) -> PathBuf {
        self.root.join(BANNER_FILE)
    }

    pub fn trailer_path(&self) -> PathBuf {
        self.root.join(TRAILER_FILE)
    }

    pub fn screenshot_path(&self, filename: &str) -> PathBuf {
        self.root.join(SCREENSHOTS_DIR).join(filename)
    }

    pub fn description_image_path(&self, filename: &str) -> PathBuf {
        self.root.join(DESCRIPTION_IMAGES_DIR).join(filename)
    }

    /// The trailer path as stored on the record: relative to the data
    /// directory, forward slashes, no traversal.
    pub fn web_trailer_path(&self) -> String {
        format!("games/{}/{}", self.folder, TRAILER_FILE)
    }

    /// Create the folder and its asset subdirectories.
    ///
    /// Idempotent: directories that already exist are not an error, so
    /// re-ingesting an existing game reuses its folder in place.
    pub async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(SCREENSHOTS_DIR)).await?;
        tokio::fs::create_dir_all(self.root.join(DESCRIPTION_IMAGES_DIR)).await?;
        Ok(())
    }
}
