//! Error type for `wordbook-store-sqlite`.

use thiserror::Error;
use wordbook_core::{
  id::{ExerciseId, WordId},
  store::{Conflict, StoreError},
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] wordbook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("word not found: {0}")]
  WordNotFound(WordId),

  #[error("exercise not found: {0}")]
  ExerciseNotFound(ExerciseId),

  #[error("exercise {0} is already scored")]
  AlreadyScored(ExerciseId),

  #[error("a word with term {0:?} already exists")]
  DuplicateTerm(String),

  /// The file was written by a newer build with migrations we do not know.
  #[error("database schema version {found} is newer than supported version {supported}")]
  SchemaTooNew { found: i64, supported: i64 },
}

impl StoreError for Error {
  fn conflict(&self) -> Option<Conflict> {
    match self {
      Self::DuplicateTerm(_) => Some(Conflict::DuplicateTerm),
      Self::AlreadyScored(id) => Some(Conflict::AlreadyScored(*id)),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
