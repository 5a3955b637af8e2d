#![forbid(unsafe_code)]

pub mod catalog;
pub mod json_store;
pub mod progress;
pub mod repository;

pub use catalog::{CatalogError, FsLessonCatalog, InMemoryCatalog, LessonCatalog};
pub use json_store::JsonProgressStore;
pub use progress::{LessonProgress, ProgressData, StreakState};
pub use repository::{InMemoryProgressStore, ProgressRepository, StorageError};
