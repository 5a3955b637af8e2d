use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::ids::LessonId;
use crate::normalize::normalize;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson name cannot be empty")]
    EmptyName,

    #[error("lesson has no sentences")]
    NoSentences,

    #[error("sentence index must be 1-based, got 0")]
    ZeroIndex,

    #[error("sentence {index} normalizes to zero words")]
    EmptySentence { index: u32 },
}

//
// ─── SENTENCE ──────────────────────────────────────────────────────────────────
//

/// A single reference sentence within a lesson.
///
/// Carries the ground-truth text and its 1-based position, which also
/// names the sentence's audio asset (`sentence_01`, `sentence_02`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    index: u32,
    text: String,
}

impl Sentence {
    /// Creates a sentence at the given 1-based position.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::ZeroIndex` for index 0 and
    /// `LessonError::EmptySentence` if the text normalizes to zero words.
    /// An empty reference is a data-integrity error, caught at load time
    /// rather than at scoring time.
    pub fn new(index: u32, text: impl Into<String>) -> Result<Self, LessonError> {
        if index == 0 {
            return Err(LessonError::ZeroIndex);
        }
        let text = text.into().trim().to_owned();
        if normalize(&text).split_whitespace().next().is_none() {
            return Err(LessonError::EmptySentence { index });
        }
        Ok(Self { index, text })
    }

    /// 1-based position within the lesson.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// File stem of this sentence's audio asset, e.g. `sentence_03`.
    #[must_use]
    pub fn audio_stem(&self) -> String {
        audio_stem(self.index)
    }
}

/// File stem for the audio asset of the 1-based sentence position.
#[must_use]
pub fn audio_stem(index: u32) -> String {
    format!("sentence_{index:02}")
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A named, ordered collection of practice sentences with associated audio.
///
/// Built once at catalog-load time and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    sentences: Vec<Sentence>,
    audio_dir: PathBuf,
}

impl Lesson {
    /// Creates a new lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoSentences` if the sentence list is empty.
    pub fn new(
        id: LessonId,
        sentences: Vec<Sentence>,
        audio_dir: impl Into<PathBuf>,
    ) -> Result<Self, LessonError> {
        if sentences.is_empty() {
            return Err(LessonError::NoSentences);
        }

        Ok(Self {
            id,
            sentences,
            audio_dir: audio_dir.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Number of sentences in the lesson.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentence at the given 0-based cursor position, if in range.
    #[must_use]
    pub fn sentence_at(&self, cursor: usize) -> Option<&Sentence> {
        self.sentences.get(cursor)
    }

    #[must_use]
    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
