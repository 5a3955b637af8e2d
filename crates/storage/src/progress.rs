//! Persisted progress records: per-lesson history, weak sentences,
//! completion flags, and the daily practice streak.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dictee_core::model::LessonId;

//
// ─── LESSON PROGRESS ───────────────────────────────────────────────────────────
//

/// Accumulated history for one lesson across practice runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LessonProgress {
    /// Every recorded accuracy, in submission order.
    pub scores: Vec<f64>,
    /// 1-based indices of sentences that ever scored below 100%.
    /// Set semantics: repeated weak submissions do not duplicate.
    pub weak_sentences: BTreeSet<u32>,
    pub completed: bool,
}

impl LessonProgress {
    /// Records one submission: appends the accuracy and bookmarks the
    /// sentence as weak when it scored below 100%.
    pub fn record_score(&mut self, sentence_index: u32, accuracy: f64) {
        self.scores.push(accuracy);
        if accuracy < 100.0 {
            self.weak_sentences.insert(sentence_index);
        }
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Mean of all recorded scores, rounded to two decimals. `None` when
    /// nothing has been recorded yet.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let mean = self.scores.iter().sum::<f64>() / self.scores.len() as f64;
        Some((mean * 100.0).round() / 100.0)
    }
}

//
// ─── STREAK ────────────────────────────────────────────────────────────────────
//

/// Consecutive-day practice counter.
///
/// The counter only ever moves forward: the first interaction on a date
/// different from `last_practice` increments it, a same-day interaction is
/// a no-op, and a gap of several days still increments by exactly one.
/// That last part mirrors the behavior this trainer inherited; a
/// reset-on-gap policy was deliberately not introduced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakState {
    pub last_practice: Option<NaiveDate>,
    pub streak: u32,
}

impl StreakState {
    /// Registers practice on the given date. Returns true when the streak
    /// advanced.
    pub fn record_practice_day(&mut self, today: NaiveDate) -> bool {
        if self.last_practice == Some(today) {
            return false;
        }
        self.last_practice = Some(today);
        self.streak += 1;
        true
    }
}

//
// ─── PROGRESS DATA ─────────────────────────────────────────────────────────────
//

/// Everything the trainer persists: per-lesson progress plus the streak.
///
/// Serialized as one JSON document; must round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressData {
    pub lessons: BTreeMap<LessonId, LessonProgress>,
    pub streak: StreakState,
}

impl ProgressData {
    /// Progress entry for a lesson, created empty on first touch.
    pub fn lesson_mut(&mut self, id: &LessonId) -> &mut LessonProgress {
        self.lessons.entry(id.clone()).or_default()
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&LessonProgress> {
        self.lessons.get(id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_sentences_have_set_semantics() {
        let mut progress = LessonProgress::default();
        progress.record_score(3, 60.0);
        progress.record_score(3, 40.0);
        progress.record_score(5, 100.0);

        assert_eq!(progress.scores, vec![60.0, 40.0, 100.0]);
        assert_eq!(progress.weak_sentences.len(), 1);
        assert!(progress.weak_sentences.contains(&3));
        assert!(!progress.weak_sentences.contains(&5));
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let mut progress = LessonProgress::default();
        assert_eq!(progress.average(), None);

        progress.record_score(1, 100.0);
        progress.record_score(2, 66.67);
        progress.record_score(3, 33.33);
        // mean of 100.0, 66.67, 33.33 = 66.666... → 66.67
        assert_eq!(progress.average(), Some(66.67));
    }

    #[test]
    fn streak_increments_on_new_day_only() {
        let mut streak = StreakState::default();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert!(streak.record_practice_day(monday));
        assert_eq!(streak.streak, 1);

        // Same-day re-entry is a no-op.
        assert!(!streak.record_practice_day(monday));
        assert_eq!(streak.streak, 1);

        assert!(streak.record_practice_day(tuesday));
        assert_eq!(streak.streak, 2);
    }

    #[test]
    fn streak_ignores_gaps() {
        // Inherited behavior: a multi-day gap still bumps by one.
        let mut streak = StreakState::default();
        let day_one = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let day_ten = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();

        streak.record_practice_day(day_one);
        streak.record_practice_day(day_ten);
        assert_eq!(streak.streak, 2);
    }

    #[test]
    fn progress_data_creates_lessons_on_first_touch() {
        let mut data = ProgressData::default();
        let id = LessonId::new("dagen").unwrap();
        assert!(data.lesson(&id).is_none());

        data.lesson_mut(&id).record_score(1, 80.0);
        assert_eq!(data.lesson(&id).unwrap().scores, vec![80.0]);
    }
}
