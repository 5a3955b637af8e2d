use std::sync::Arc;

use dictee_core::model::LessonId;
use storage::progress::{LessonProgress, StreakState};
use storage::repository::ProgressRepository;

use crate::error::OverviewError;

//
// ─── VIEW ITEMS ────────────────────────────────────────────────────────────────
//

/// Read-side summary of one lesson's recorded history.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonOverview {
    pub id: LessonId,
    pub attempts: usize,
    /// Mean of all recorded scores, rounded to two decimals.
    pub average: Option<f64>,
    /// 1-based indices of sentences that ever scored below 100%.
    pub weak_sentences: Vec<u32>,
    pub completed: bool,
}

impl LessonOverview {
    fn from_progress(id: LessonId, progress: &LessonProgress) -> Self {
        Self {
            id,
            attempts: progress.scores.len(),
            average: progress.average(),
            weak_sentences: progress.weak_sentences.iter().copied().collect(),
            completed: progress.completed,
        }
    }
}

/// Everything the home screen shows: streak plus per-lesson summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerOverview {
    pub streak: StreakState,
    pub lessons: Vec<LessonOverview>,
}

//
// ─── OVERVIEW SERVICE ──────────────────────────────────────────────────────────
//

/// Read-only queries over persisted progress.
#[derive(Clone)]
pub struct ProgressOverviewService {
    store: Arc<dyn ProgressRepository>,
}

impl ProgressOverviewService {
    #[must_use]
    pub fn new(store: Arc<dyn ProgressRepository>) -> Self {
        Self { store }
    }

    /// Summaries for every lesson with recorded history, plus the streak.
    ///
    /// # Errors
    ///
    /// Returns `OverviewError::Storage` if progress cannot be loaded.
    pub fn overview(&self) -> Result<TrainerOverview, OverviewError> {
        let data = self.store.load()?;
        let lessons = data
            .lessons
            .iter()
            .map(|(id, progress)| LessonOverview::from_progress(id.clone(), progress))
            .collect();

        Ok(TrainerOverview {
            streak: data.streak,
            lessons,
        })
    }

    /// Summary for one lesson, if it has recorded history.
    ///
    /// # Errors
    ///
    /// Returns `OverviewError::Storage` if progress cannot be loaded.
    pub fn lesson(&self, id: &LessonId) -> Result<Option<LessonOverview>, OverviewError> {
        let data = self.store.load()?;
        Ok(data
            .lesson(id)
            .map(|progress| LessonOverview::from_progress(id.clone(), progress)))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
