//! Whole-file JSON persistence for practice progress.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::progress::ProgressData;
use crate::repository::{ProgressRepository, StorageError};

/// Progress store backed by a single JSON file.
///
/// Reads are forgiving: a missing or corrupt file loads as empty progress.
/// Writes go through a sibling temp file and a rename, so an interrupted
/// write leaves the previous document intact rather than a truncated one.
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressRepository for JsonProgressStore {
    fn load(&self) -> Result<ProgressData, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no progress file yet, starting empty");
                return Ok(ProgressData::default());
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "unreadable progress file, starting empty");
                return Ok(ProgressData::default());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(data) => Ok(data),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "corrupt progress file, starting empty");
                Ok(ProgressData::default())
            }
        }
    }

    fn save(&self, data: &ProgressData) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Write(e.to_string()))?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp = fs::File::create(&tmp_path).map_err(|e| StorageError::Write(e.to_string()))?;
        tmp.write_all(&encoded)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        tmp.sync_all().map_err(|e| StorageError::Write(e.to_string()))?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::Write(e.to_string()))?;
        debug!(path = %self.path.display(), "progress saved");
        Ok(())
    }
}
