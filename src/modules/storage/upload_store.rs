//! Local filesystem upload store
//!
//! Files keep the client-supplied name, so a second upload with the same
//! name replaces the first (last writer wins).

use std::path::PathBuf;
use tracing::{debug, info};

// Longest single path component most filesystems accept, in bytes
const MAX_FILE_NAME_BYTES: usize = 255;

use crate::core::error::AppError;
use crate::shared::constants::{ANNOTATED_PREFIX, UPLOAD_URL_PREFIX};
use crate::shared::validation::is_plain_file_name;

/// A file written to the uploads directory
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Absolute or config-relative location on disk
    pub disk_path: PathBuf,
    /// Path persisted in the database, e.g. `static/uploads/road.jpg`
    pub public_path: String,
}

pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the uploads directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready: {}", self.root.display());
        Ok(())
    }

    /// Write `data` under `file_name`, replacing any previous file of that name.
    ///
    /// The name must leave room for its `detected_` rendering in the same directory.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> Result<StoredUpload, AppError> {
        if !is_plain_file_name(file_name) {
            return Err(AppError::BadRequest(format!(
                "Invalid file name '{}'",
                file_name
            )));
        }
        if ANNOTATED_PREFIX.len() + file_name.len() > MAX_FILE_NAME_BYTES {
            return Err(AppError::BadRequest("File name is too long".to_string()));
        }

        self.ensure_dir().await?;

        let disk_path = self.root.join(file_name);
        tokio::fs::write(&disk_path, data).await?;

        debug!("Saved upload '{}' ({} bytes)", disk_path.display(), data.len());

        Ok(StoredUpload {
            disk_path,
            public_path: Self::public_path(file_name),
        })
    }

    /// Database path for a file stored in the uploads directory
    pub fn public_path(file_name: &str) -> String {
        format!("{}/{}", UPLOAD_URL_PREFIX, file_name)
    }
}
