//! Error types for `wordbook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown direction token: {0:?}")]
  UnknownDirection(String),

  #[error("unknown example origin: {0:?}")]
  UnknownOrigin(String),

  #[error("score {0} is outside 0..=10")]
  ScoreOutOfRange(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
