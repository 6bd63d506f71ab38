//! The 0–10 translation score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An integer score in `0..=10`.
///
/// Grader output is untrusted; [`Score::clamped`] is the only way raw numbers
/// from a model enter the domain.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
  pub const MIN: Score = Score(0);
  pub const MAX: Score = Score(10);

  /// Clamp an arbitrary integer into range.
  pub fn clamped(raw: i64) -> Self { Self(raw.clamp(0, 10) as u8) }

  /// Strict constructor for values read back from storage.
  pub fn new(raw: i64) -> Result<Self> {
    if (0..=10).contains(&raw) {
      Ok(Self(raw as u8))
    } else {
      Err(Error::ScoreOutOfRange(raw))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Score {
  type Error = Error;

  fn try_from(raw: u8) -> Result<Self> { Self::new(i64::from(raw)) }
}

impl From<Score> for u8 {
  fn from(score: Score) -> u8 { score.0 }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/10", self.0)
  }
}
