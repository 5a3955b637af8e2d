//! Lesson discovery and loading.
//!
//! Lessons live as directories under a root: each directory name is the
//! lesson id, `sentences.txt` holds one reference sentence per line, and
//! `audio/` holds the recordings named after the sentence position
//! (`sentence_01.mp3`, `sentence_02.mp3`, ...). Sentence data is plain
//! text on purpose; loading a lesson never executes anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::debug;

use dictee_core::model::{Lesson, LessonError, LessonId, Sentence, audio_stem};

/// Audio container formats the catalog will probe for, in order.
const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("lesson {0} not found")]
    LessonNotFound(LessonId),

    #[error("failed to read lesson catalog: {0}")]
    Io(String),

    #[error(transparent)]
    InvalidLesson(#[from] LessonError),
}

//
// ─── CATALOG CONTRACT ──────────────────────────────────────────────────────────
//

/// Supplies lessons and their audio assets to the practice loop.
pub trait LessonCatalog: Send + Sync {
    /// All known lesson ids, in stable order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the catalog cannot be enumerated.
    fn list_lessons(&self) -> Result<Vec<LessonId>, CatalogError>;

    /// Load a lesson's ordered sentence list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LessonNotFound` for an unknown id and
    /// `CatalogError::InvalidLesson` for unusable sentence data.
    fn load_lesson(&self, id: &LessonId) -> Result<Lesson, CatalogError>;

    /// Path to the audio recording for the 1-based sentence index, or
    /// `None` when no recording exists. Absence is a warning for the UI,
    /// never an error.
    fn audio_path(&self, id: &LessonId, index: u32) -> Option<PathBuf>;
}

//
// ─── FILESYSTEM CATALOG ────────────────────────────────────────────────────────
//

/// Directory-per-lesson catalog rooted at a lessons directory.
#[derive(Debug, Clone)]
pub struct FsLessonCatalog {
    root: PathBuf,
}

impl FsLessonCatalog {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lesson_dir(&self, id: &LessonId) -> PathBuf {
        self.root.join(id.as_str())
    }
}

impl LessonCatalog for FsLessonCatalog {
    fn list_lessons(&self) -> Result<Vec<LessonId>, CatalogError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| CatalogError::Io(e.to_string()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::Io(e.to_string()))?;
            let path = entry.path();
            if !path.is_dir() || !path.join("sentences.txt").is_file() {
                continue;
            }
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| LessonId::new(name))
            {
                ids.push(id);
            }
        }

        ids.sort();
        debug!(root = %self.root.display(), count = ids.len(), "listed lessons");
        Ok(ids)
    }

    fn load_lesson(&self, id: &LessonId) -> Result<Lesson, CatalogError> {
        let dir = self.lesson_dir(id);
        let sentences_file = dir.join("sentences.txt");
        if !sentences_file.is_file() {
            return Err(CatalogError::LessonNotFound(id.clone()));
        }

        let raw =
            std::fs::read_to_string(&sentences_file).map_err(|e| CatalogError::Io(e.to_string()))?;

        let mut sentences = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let index = u32::try_from(sentences.len() + 1)
                .map_err(|_| CatalogError::Io("too many sentences".into()))?;
            sentences.push(Sentence::new(index, line)?);
        }

        Ok(Lesson::new(id.clone(), sentences, dir.join("audio"))?)
    }

    fn audio_path(&self, id: &LessonId, index: u32) -> Option<PathBuf> {
        let stem = audio_stem(index);
        let audio_dir = self.lesson_dir(id).join("audio");
        AUDIO_EXTENSIONS
            .iter()
            .map(|ext| audio_dir.join(format!("{stem}.{ext}")))
            .find(|candidate| candidate.is_file())
    }
}

//
// ─── IN-MEMORY CATALOG ─────────────────────────────────────────────────────────
//

/// Catalog over pre-built lessons, for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    lessons: Arc<Mutex<BTreeMap<LessonId, Lesson>>>,
    audio: Arc<Mutex<BTreeMap<(LessonId, u32), PathBuf>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a lesson, replacing any previous one with the same id.
    pub fn insert_lesson(&self, lesson: Lesson) {
        let mut guard = self.lessons.lock().expect("catalog lock poisoned");
        guard.insert(lesson.id().clone(), lesson);
    }

    /// Registers an audio path for a sentence.
    pub fn insert_audio(&self, id: LessonId, index: u32, path: impl Into<PathBuf>) {
        let mut guard = self.audio.lock().expect("catalog lock poisoned");
        guard.insert((id, index), path.into());
    }
}

impl LessonCatalog for InMemoryCatalog {
    fn list_lessons(&self) -> Result<Vec<LessonId>, CatalogError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }

    fn load_lesson(&self, id: &LessonId) -> Result<Lesson, CatalogError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::LessonNotFound(id.clone()))
    }

    fn audio_path(&self, id: &LessonId, index: u32) -> Option<PathBuf> {
        let guard = self.audio.lock().ok()?;
        guard.get(&(id.clone(), index)).cloned()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
