//! Shared error types for the services crate.

use thiserror::Error;

use storage::catalog::CatalogError;
use storage::repository::StorageError;

use crate::sessions::Phase;

/// Errors emitted by session services.
///
/// Scoring problems never appear here: an unusable reference degrades to a
/// flagged, skippable sentence instead of an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("lesson already completed")]
    Completed,

    #[error("cannot {action} while {phase}")]
    InvalidTransition { phase: Phase, action: &'static str },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the progress overview service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverviewError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
