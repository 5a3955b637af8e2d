mod machine;
mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{OverviewError, SessionError};
pub use machine::{Phase, SessionState};
pub use progress::SessionProgress;
pub use view::{LessonOverview, ProgressOverviewService, TrainerOverview};
pub use workflow::{PracticeService, SentencePrompt, SubmissionOutcome};
