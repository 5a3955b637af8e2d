//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Per-word verdict produced by the aligner.
///
/// Items come back in reference-word order, with any surplus user words
/// appended as `Extra` in the order they were typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackItem {
    /// The user's word matched the reference word at this position.
    Match { expected: String },
    /// The user wrote something else at this position.
    Mismatch { expected: String, actual: String },
    /// The user ran out of words before the reference did.
    Missing { expected: String },
    /// The user supplied a word beyond the reference length.
    Extra { actual: String },
}

impl FeedbackItem {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, FeedbackItem::Match { .. })
    }
}

//
// ─── SCORE RECORD ──────────────────────────────────────────────────────────────
//

/// Outcome of scoring one transcription against one reference sentence.
///
/// Produced once per submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    accuracy: f64,
    feedback: Vec<FeedbackItem>,
}

impl ScoreRecord {
    #[must_use]
    pub(crate) fn new(accuracy: f64, feedback: Vec<FeedbackItem>) -> Self {
        Self { accuracy, feedback }
    }

    /// Accuracy percentage in 0–100, rounded to two decimals.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn feedback(&self) -> &[FeedbackItem] {
        &self.feedback
    }

    /// True when every reference word matched and nothing extra was typed.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.feedback.iter().all(FeedbackItem::is_match)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
