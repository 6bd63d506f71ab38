//! Error type for `wordbook-ai`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("API error (status {status}): {message}")]
  Api { status: u16, message: String },

  #[error("model {model} returned empty content")]
  EmptyContent { model: String },

  /// Every model and retry was used up. `last` is the final failure seen.
  #[error("completion failed after {attempts} attempts: {last}")]
  Exhausted {
    attempts: u32,
    #[source]
    last:     Box<Error>,
  },

  #[error("generated sentence was empty")]
  EmptySentence,

  #[error("grader response could not be parsed: {raw:?}")]
  Unparseable { raw: String },
}

impl Error {
  /// Rate limits, server errors, timeouts, connection failures and garbled
  /// success bodies are worth another attempt; everything else is not.
  pub fn is_transient(&self) -> bool {
    match self {
      Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_decode(),
      Self::Api { status, .. } => *status == 429 || *status >= 500,
      Self::EmptyContent { .. } => true,
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
