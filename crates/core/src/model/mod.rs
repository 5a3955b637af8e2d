mod ids;
mod lesson;
mod score;
mod settings;

pub use ids::{LessonId, ParseIdError};
pub use lesson::{Lesson, LessonError, Sentence, audio_stem};
pub use score::{FeedbackItem, ScoreRecord};
pub use settings::{MatchPolicy, SettingsError, TrainerSettings};
