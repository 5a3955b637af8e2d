use std::fmt;

use dictee_core::model::{Lesson, ScoreRecord, Sentence, TrainerSettings};

use crate::error::SessionError;
use super::progress::SessionProgress;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the session currently sits in the listen-type-review cycle.
///
/// `NotStarted` is only ever observed before a lesson is selected;
/// `AwaitingSubmission` is passed through atomically by the synchronous
/// submit call. `LessonComplete` is terminal and not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    AwaitingListen,
    Listening,
    ReadyToType,
    AwaitingSubmission,
    ShowingFeedback,
    LessonComplete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NotStarted => "not started",
            Phase::AwaitingListen => "awaiting listen",
            Phase::Listening => "listening",
            Phase::ReadyToType => "ready to type",
            Phase::AwaitingSubmission => "awaiting submission",
            Phase::ShowingFeedback => "showing feedback",
            Phase::LessonComplete => "lesson complete",
        };
        write!(f, "{name}")
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// In-memory state for one practice session over one lesson.
///
/// Owned by the caller and passed explicitly into each transition; there
/// is no ambient session. Selecting a different lesson means discarding
/// this value and building a fresh one.
///
/// In strict-listening mode each sentence may enter `Listening` exactly
/// once, and typing only unlocks after `finish_listening`. In free mode
/// the gate is open: replays are allowed and typing is legal from
/// `AwaitingListen` onwards.
pub struct SessionState {
    lesson: Lesson,
    strict_listening: bool,
    cursor: usize,
    listened_current: bool,
    phase: Phase,
    scores: Vec<f64>,
    last_feedback: Option<ScoreRecord>,
    reference_problem: bool,
}

impl SessionState {
    /// Starts a session on the given lesson; the session opens on the
    /// first sentence in `AwaitingListen`.
    #[must_use]
    pub fn new(lesson: Lesson, settings: &TrainerSettings) -> Self {
        Self {
            lesson,
            strict_listening: settings.strict_listening(),
            cursor: 0,
            listened_current: false,
            phase: Phase::AwaitingListen,
            scores: Vec::new(),
            last_feedback: None,
            reference_problem: false,
        }
    }

    // Accessors
    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 0-based cursor into the lesson's sentence list.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sentence under the cursor; `None` once the lesson is complete.
    #[must_use]
    pub fn current_sentence(&self) -> Option<&Sentence> {
        self.lesson.sentence_at(self.cursor)
    }

    /// Accuracy history for this session, in submission order.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Feedback from the most recent submission, when one is on display.
    #[must_use]
    pub fn last_feedback(&self) -> Option<&ScoreRecord> {
        self.last_feedback.as_ref()
    }

    /// True when the sentence on display was flagged as unusable data
    /// rather than scored.
    #[must_use]
    pub fn reference_problem(&self) -> bool {
        self.reference_problem
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::LessonComplete
    }

    /// Mean session accuracy so far, rounded to two decimals.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let mean = self.scores.iter().sum::<f64>() / self.scores.len() as f64;
        Some((mean * 100.0).round() / 100.0)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.lesson.len(),
            answered: self.scores.len(),
            remaining: self.lesson.len().saturating_sub(self.cursor),
            phase: self.phase,
        }
    }

    /// Whether a transcription would be accepted right now.
    #[must_use]
    pub fn can_type(&self) -> bool {
        if self.strict_listening {
            self.phase == Phase::ReadyToType
        } else {
            matches!(
                self.phase,
                Phase::AwaitingListen | Phase::Listening | Phase::ReadyToType
            )
        }
    }

    /// Begin playback of the current sentence.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last sentence, and
    /// `SessionError::InvalidTransition` when the gate refuses: in strict
    /// mode any attempt after the one allowed playback, in free mode any
    /// phase where no sentence is up for listening.
    pub fn start_listening(&mut self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        let allowed = if self.strict_listening {
            self.phase == Phase::AwaitingListen && !self.listened_current
        } else {
            matches!(self.phase, Phase::AwaitingListen | Phase::ReadyToType)
        };
        if !allowed {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                action: "start listening",
            });
        }

        self.listened_current = true;
        self.phase = Phase::Listening;
        Ok(())
    }

    /// Declare playback finished, unlocking typing.
    ///
    /// Irreversible for the current sentence in strict mode: there is no
    /// way back into `Listening` without advancing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless currently
    /// `Listening`.
    pub fn finish_listening(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Listening {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                action: "finish listening",
            });
        }
        self.phase = Phase::ReadyToType;
        Ok(())
    }

    /// Accept a transcription for scoring.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last sentence and
    /// `SessionError::InvalidTransition` when typing is not legal yet;
    /// in strict mode that is any phase before `ReadyToType`.
    pub(crate) fn begin_submission(&mut self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if !self.can_type() {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                action: "submit a transcription",
            });
        }
        self.phase = Phase::AwaitingSubmission;
        Ok(())
    }

    /// Store the scoring outcome and move to feedback display.
    pub(crate) fn complete_submission(&mut self, record: ScoreRecord) -> &ScoreRecord {
        debug_assert_eq!(self.phase, Phase::AwaitingSubmission);
        self.scores.push(record.accuracy());
        self.reference_problem = false;
        self.phase = Phase::ShowingFeedback;
        self.last_feedback.insert(record)
    }

    /// Mark the current sentence as unusable reference data and move to
    /// feedback display without recording a score.
    pub(crate) fn flag_reference_problem(&mut self) {
        debug_assert_eq!(self.phase, Phase::AwaitingSubmission);
        self.last_feedback = None;
        self.reference_problem = true;
        self.phase = Phase::ShowingFeedback;
    }

    /// Advance to the next sentence, or into `LessonComplete` when the
    /// cursor walks off the end.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if already complete and
    /// `SessionError::InvalidTransition` unless feedback is on display.
    pub fn next_sentence(&mut self) -> Result<Phase, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.phase != Phase::ShowingFeedback {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                action: "advance to the next sentence",
            });
        }

        self.cursor += 1;
        self.listened_current = false;
        self.last_feedback = None;
        self.reference_problem = false;
        self.phase = if self.cursor >= self.lesson.len() {
            Phase::LessonComplete
        } else {
            Phase::AwaitingListen
        };
        Ok(self.phase)
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("lesson", &self.lesson.id())
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .field("scores_len", &self.scores.len())
            .field("strict_listening", &self.strict_listening)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use dictee_core::model::{LessonId, MatchPolicy, Sentence};
    use dictee_core::scoring::Scorer;

    fn build_lesson(texts: &[&str]) -> Lesson {
        let sentences = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Sentence::new(u32::try_from(i).unwrap() + 1, *text).unwrap())
            .collect();
        Lesson::new(LessonId::new("dagen").unwrap(), sentences, "audio").unwrap()
    }

    fn strict_settings() -> TrainerSettings {
        TrainerSettings::default_strict()
    }

    fn free_settings() -> TrainerSettings {
        TrainerSettings::new(MatchPolicy::Exact, 0.85, false).unwrap()
    }

    fn score(session: &SessionState, input: &str) -> ScoreRecord {
        let scorer = Scorer::from_settings(&strict_settings());
        let text = session.current_sentence().unwrap().text().to_owned();
        scorer.score(input, &text).unwrap()
    }

    #[test]
    fn strict_flow_walks_the_phases() {
        let mut session = SessionState::new(
            build_lesson(&["Dan is het weekend.", "Het is vandaag dinsdag."]),
            &strict_settings(),
        );

        assert_eq!(session.phase(), Phase::AwaitingListen);
        assert!(!session.can_type());

        session.start_listening().unwrap();
        assert_eq!(session.phase(), Phase::Listening);
        session.finish_listening().unwrap();
        assert_eq!(session.phase(), Phase::ReadyToType);
        assert!(session.can_type());

        session.begin_submission().unwrap();
        let record = {
            let scorer = Scorer::from_settings(&strict_settings());
            scorer.score("dan is het weekend", "Dan is het weekend.").unwrap()
        };
        session.complete_submission(record);
        assert_eq!(session.phase(), Phase::ShowingFeedback);
        assert_eq!(session.scores(), &[100.0]);

        assert_eq!(session.next_sentence().unwrap(), Phase::AwaitingListen);
        assert_eq!(session.cursor(), 1);
        assert!(session.last_feedback().is_none());

        let progress = session.progress();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
        assert_eq!(progress.phase, Phase::AwaitingListen);
    }

    #[test]
    fn strict_mode_refuses_replay() {
        let mut session =
            SessionState::new(build_lesson(&["Dan is het weekend."]), &strict_settings());

        session.start_listening().unwrap();
        session.finish_listening().unwrap();

        // One playback per sentence: no re-entry from ReadyToType.
        let err = session.start_listening().unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[test]
    fn strict_mode_refuses_typing_before_listening_finishes() {
        let mut session =
            SessionState::new(build_lesson(&["Dan is het weekend."]), &strict_settings());

        let err = session.begin_submission().unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                phase: Phase::AwaitingListen,
                ..
            }
        ));

        session.start_listening().unwrap();
        let err = session.begin_submission().unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[test]
    fn free_mode_allows_immediate_typing_and_replay() {
        let mut session =
            SessionState::new(build_lesson(&["Dan is het weekend."]), &free_settings());

        assert!(session.can_type());

        // Replay as often as you like.
        session.start_listening().unwrap();
        session.finish_listening().unwrap();
        session.start_listening().unwrap();
        session.finish_listening().unwrap();

        session.begin_submission().unwrap();
        let record = score(&session, "dan is het weekend");
        session.complete_submission(record);
        assert_eq!(session.phase(), Phase::ShowingFeedback);
    }

    #[test]
    fn cursor_walking_off_the_end_completes_the_lesson() {
        let mut session =
            SessionState::new(build_lesson(&["Dan is het weekend."]), &free_settings());

        session.begin_submission().unwrap();
        let record = score(&session, "");
        session.complete_submission(record);

        assert_eq!(session.next_sentence().unwrap(), Phase::LessonComplete);
        assert!(session.is_complete());
        assert!(session.current_sentence().is_none());

        // Terminal: every further transition is refused.
        assert!(matches!(
            session.start_listening().unwrap_err(),
            SessionError::Completed
        ));
        assert!(matches!(
            session.begin_submission().unwrap_err(),
            SessionError::Completed
        ));
        assert!(matches!(
            session.next_sentence().unwrap_err(),
            SessionError::Completed
        ));
    }

    #[test]
    fn flagged_reference_records_no_score() {
        let mut session = SessionState::new(
            build_lesson(&["Dan is het weekend.", "Het is vandaag dinsdag."]),
            &free_settings(),
        );

        session.begin_submission().unwrap();
        session.flag_reference_problem();

        assert!(session.reference_problem());
        assert!(session.last_feedback().is_none());
        assert!(session.scores().is_empty());

        // The session still advances normally.
        assert_eq!(session.next_sentence().unwrap(), Phase::AwaitingListen);
        assert!(!session.reference_problem());
    }

    #[test]
    fn phase_display_names_are_human_readable() {
        let phases = [
            (Phase::NotStarted, "not started"),
            (Phase::AwaitingListen, "awaiting listen"),
            (Phase::Listening, "listening"),
            (Phase::ReadyToType, "ready to type"),
            (Phase::AwaitingSubmission, "awaiting submission"),
            (Phase::ShowingFeedback, "showing feedback"),
            (Phase::LessonComplete, "lesson complete"),
        ];
        for (phase, expected) in phases {
            assert_eq!(phase.to_string(), expected);
        }
    }

    #[test]
    fn session_average_rounds_to_two_decimals() {
        let mut session = SessionState::new(
            build_lesson(&["een twee drie", "vier vijf zes", "zeven acht negen"]),
            &free_settings(),
        );
        assert_eq!(session.average(), None);

        for input in ["een twee drie", "vier", "zeven acht"] {
            session.begin_submission().unwrap();
            let record = score(&session, input);
            session.complete_submission(record);
            session.next_sentence().unwrap();
        }

        // 100.0, 33.33, 66.67 → mean 66.666... → 66.67
        assert_eq!(session.average(), Some(66.67));
        assert!(session.is_complete());
    }
}
