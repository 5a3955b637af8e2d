#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use dictee_core::Clock;

pub use error::{OverviewError, SessionError};
pub use sessions::{
    LessonOverview, Phase, PracticeService, ProgressOverviewService, SentencePrompt,
    SessionProgress, SessionState, SubmissionOutcome, TrainerOverview,
};
