//! Error type for `wordbook-service`.

use thiserror::Error;
use wordbook_core::id::{ExerciseId, WordId};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("word {0} not found")]
  WordNotFound(WordId),

  #[error("exercise {0} not found")]
  ExerciseNotFound(ExerciseId),

  #[error("exercise {0} has already been scored")]
  AlreadyScored(ExerciseId),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// No usable sentence could be obtained. Nothing was persisted.
  #[error("sentence generation failed: {0}")]
  Generation(#[source] BoxError),

  /// No usable grade could be obtained. Nothing was persisted.
  #[error("grading failed: {0}")]
  Grading(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
