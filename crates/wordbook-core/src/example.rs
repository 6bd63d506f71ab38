//! Example sentences attached to a word.
//!
//! Examples are immutable once written. A scored example is the trace of an
//! answered exercise; a manual example is a free-form note with no score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  direction::Direction,
  id::{ExampleId, ExerciseId, WordId},
  score::Score,
};

/// Provenance tag of an example, as stored in the `origin` column.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Origin {
  Ai,
  Manual,
}

/// Where an example came from. Scored examples always carry the exercise that
/// produced them along with its direction and score; manual ones carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "UPPERCASE")]
pub enum Provenance {
  Manual,
  #[serde(rename = "AI")]
  Scored {
    exercise_id: ExerciseId,
    direction:   Direction,
    score:       Score,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
  pub id:         ExampleId,
  pub word_id:    WordId,
  pub text:       String,
  pub feedback:   String,
  #[serde(flatten)]
  pub provenance: Provenance,
  pub created_at: DateTime<Utc>,
}

impl Example {
  pub fn origin(&self) -> Origin {
    match self.provenance {
      Provenance::Manual => Origin::Manual,
      Provenance::Scored { .. } => Origin::Ai,
    }
  }

  pub fn score(&self) -> Option<Score> {
    match self.provenance {
      Provenance::Scored { score, .. } => Some(score),
      Provenance::Manual => None,
    }
  }

  pub fn direction(&self) -> Option<Direction> {
    match self.provenance {
      Provenance::Scored { direction, .. } => Some(direction),
      Provenance::Manual => None,
    }
  }

  pub fn exercise_id(&self) -> Option<ExerciseId> {
    match self.provenance {
      Provenance::Scored { exercise_id, .. } => Some(exercise_id),
      Provenance::Manual => None,
    }
  }
}

/// Input to [`crate::store::VocabStore::insert_example`].
#[derive(Debug, Clone)]
pub struct NewExample {
  pub word_id:    WordId,
  pub text:       String,
  pub feedback:   String,
  pub provenance: Provenance,
}

impl NewExample {
  pub fn manual(word_id: WordId, text: impl Into<String>) -> Self {
    Self {
      word_id,
      text: text.into(),
      feedback: String::new(),
      provenance: Provenance::Manual,
    }
  }

  pub fn scored(
    word_id: WordId,
    text: impl Into<String>,
    exercise_id: ExerciseId,
    direction: Direction,
    score: Score,
    feedback: impl Into<String>,
  ) -> Self {
    Self {
      word_id,
      text: text.into(),
      feedback: feedback.into(),
      provenance: Provenance::Scored { exercise_id, direction, score },
    }
  }
}
