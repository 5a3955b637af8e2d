use thiserror::Error;

use crate::model::{LessonError, SettingsError};
use crate::scoring::ScoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}
