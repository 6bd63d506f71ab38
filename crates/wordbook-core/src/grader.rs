//! The grading capability: sentence generation and translation scoring.
//!
//! Implemented by `wordbook-ai` against a chat-completion API, and by fakes in
//! tests. Transport retries and model fallback are the implementor's concern;
//! an `Err` from either method means no usable content could be obtained.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{direction::Direction, score::Score};

/// A scored translation as returned to the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
  pub score:    Score,
  /// Grader feedback, including any suggested rephrasing.
  pub feedback: String,
}

pub trait Grader: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Produce one practice sentence in the language implied by `direction`
  /// that uses the word.
  fn generate_sentence<'a>(
    &'a self,
    direction: Direction,
    term: &'a str,
    translation: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Score `answer` as a translation of `original`.
  fn score_translation<'a>(
    &'a self,
    direction: Direction,
    original: &'a str,
    answer: &'a str,
  ) -> impl Future<Output = Result<Grade, Self::Error>> + Send + 'a;
}
