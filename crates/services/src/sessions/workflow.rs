use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use dictee_core::Clock;
use dictee_core::model::{LessonId, ScoreRecord, TrainerSettings};
use dictee_core::scoring::Scorer;
use storage::catalog::LessonCatalog;
use storage::repository::ProgressRepository;

use crate::error::SessionError;
use super::machine::{Phase, SessionState};

//
// ─── PROMPT & OUTCOME ──────────────────────────────────────────────────────────
//

/// What the UI needs to present the current sentence.
///
/// `audio` is `None` when no recording exists: a warning for the UI, not
/// an error; typing stays available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentencePrompt {
    /// 1-based sentence number, as shown to the learner.
    pub index: u32,
    pub total: usize,
    /// Reference text. The UI decides when (or whether) to reveal it.
    pub text: String,
    pub audio: Option<PathBuf>,
}

/// Result of submitting one transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// Scoring outcome; `None` when the sentence was flagged instead.
    pub record: Option<ScoreRecord>,
    /// True when the reference sentence was unusable and got skipped.
    pub reference_problem: bool,
}

//
// ─── PRACTICE SERVICE ──────────────────────────────────────────────────────────
//

/// Orchestrates lesson selection, scoring, and persisted progression.
///
/// The caller owns the `SessionState` and passes it into each operation;
/// this service owns the collaborators (catalog, progress store, scorer,
/// clock) and keeps them out of the state machine.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    catalog: Arc<dyn LessonCatalog>,
    store: Arc<dyn ProgressRepository>,
    scorer: Scorer,
    settings: TrainerSettings,
}

impl PracticeService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<dyn LessonCatalog>,
        store: Arc<dyn ProgressRepository>,
        settings: TrainerSettings,
    ) -> Self {
        Self {
            clock,
            catalog,
            store,
            scorer: Scorer::from_settings(&settings),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &TrainerSettings {
        &self.settings
    }

    /// All lessons the catalog knows about.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` if the catalog cannot be listed.
    pub fn list_lessons(&self) -> Result<Vec<LessonId>, SessionError> {
        Ok(self.catalog.list_lessons()?)
    }

    /// Start a fresh session on the given lesson.
    ///
    /// Any previous session should be dropped by the caller; selecting a
    /// lesson also registers today's practice for the streak (same-day
    /// re-entry leaves it unchanged).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` for unknown or unusable lessons and
    /// `SessionError::Storage` if the streak update cannot be persisted.
    pub fn select_lesson(&self, id: &LessonId) -> Result<SessionState, SessionError> {
        let lesson = self.catalog.load_lesson(id)?;

        let mut data = self.store.load()?;
        if data.streak.record_practice_day(self.clock.today()) {
            debug!(streak = data.streak.streak, "practice streak advanced");
            self.store.save(&data)?;
        }

        debug!(lesson = %id, sentences = lesson.len(), "session started");
        Ok(SessionState::new(lesson, &self.settings))
    }

    /// The sentence the session is currently on, with its audio asset.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the lesson is finished.
    pub fn current_prompt(&self, session: &SessionState) -> Result<SentencePrompt, SessionError> {
        let Some(sentence) = session.current_sentence() else {
            return Err(SessionError::Completed);
        };

        let audio = self
            .catalog
            .audio_path(session.lesson().id(), sentence.index());
        if audio.is_none() {
            warn!(
                lesson = %session.lesson().id(),
                sentence = sentence.index(),
                "audio file not found, playback will be skipped"
            );
        }

        Ok(SentencePrompt {
            index: sentence.index(),
            total: session.lesson().len(),
            text: sentence.text().to_owned(),
            audio,
        })
    }

    /// Score a transcription against the current sentence and persist the
    /// result.
    ///
    /// An unusable reference (normalizes to zero words) does not fail the
    /// session: the sentence is flagged, nothing is recorded, and the
    /// caller may advance past it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when typing is not legal
    /// in the current phase, `SessionError::Completed` after the last
    /// sentence, and `SessionError::Storage` when the progress write
    /// fails; in that case the score was computed but not persisted.
    pub fn submit_transcription(
        &self,
        session: &mut SessionState,
        input: &str,
    ) -> Result<SubmissionOutcome, SessionError> {
        session.begin_submission()?;

        let Some(sentence) = session.current_sentence() else {
            return Err(SessionError::Completed);
        };
        let (sentence_index, reference) = (sentence.index(), sentence.text().to_owned());

        let record = match self.scorer.score(input, &reference) {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    lesson = %session.lesson().id(),
                    sentence = sentence_index,
                    %err,
                    "unusable reference sentence, skipping"
                );
                session.flag_reference_problem();
                return Ok(SubmissionOutcome {
                    record: None,
                    reference_problem: true,
                });
            }
        };

        let record = session.complete_submission(record).clone();

        let mut data = self.store.load()?;
        data.lesson_mut(session.lesson().id())
            .record_score(sentence_index, record.accuracy());
        self.store.save(&data)?;

        debug!(
            lesson = %session.lesson().id(),
            sentence = sentence_index,
            accuracy = record.accuracy(),
            "submission recorded"
        );

        Ok(SubmissionOutcome {
            record: Some(record),
            reference_problem: false,
        })
    }

    /// Advance the session; when this completes the lesson, the completion
    /// flag is persisted immediately.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless feedback is on
    /// display, `SessionError::Completed` if already finished, and
    /// `SessionError::Storage` if persisting the completion fails.
    pub fn next_sentence(&self, session: &mut SessionState) -> Result<Phase, SessionError> {
        let phase = session.next_sentence()?;

        if phase == Phase::LessonComplete {
            let mut data = self.store.load()?;
            data.lesson_mut(session.lesson().id()).mark_completed();
            self.store.save(&data)?;
            debug!(lesson = %session.lesson().id(), "lesson completed");
        }

        Ok(phase)
    }
}
