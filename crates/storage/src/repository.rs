use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::progress::ProgressData;

/// Errors surfaced by progress stores.
///
/// `Read` failures are recovered at the store level (missing or corrupt
/// state loads as empty); `Write` failures must reach the caller, since a
/// lost write is lost user progress.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to read progress: {0}")]
    Read(String),

    #[error("failed to write progress: {0}")]
    Write(String),

    #[error("failed to encode progress: {0}")]
    Serialization(String),
}

/// Repository contract for persisted practice progress.
///
/// Whole-document semantics: `load` returns everything, `save` replaces
/// everything. The trainer is single-user and synchronous, so there is no
/// finer-grained locking discipline.
pub trait ProgressRepository: Send + Sync {
    /// Load all persisted progress.
    ///
    /// Implementations treat missing or unreadable prior state as empty
    /// `ProgressData`, not as an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for failures that cannot be recovered
    /// by starting fresh.
    fn load(&self) -> Result<ProgressData, StorageError>;

    /// Persist all progress, replacing the previous document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Write` or `StorageError::Serialization` when
    /// the document cannot be stored.
    fn save(&self, data: &ProgressData) -> Result<(), StorageError>;
}

/// Simple in-memory store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgressStore {
    data: Arc<Mutex<ProgressData>>,
}

impl InMemoryProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressRepository for InMemoryProgressStore {
    fn load(&self) -> Result<ProgressData, StorageError> {
        let guard = self
            .data
            .lock()
            .map_err(|e| StorageError::Read(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, data: &ProgressData) -> Result<(), StorageError> {
        let mut guard = self
            .data
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        *guard = data.clone();
        Ok(())
    }
}
