//! A generated practice sentence and at most one scored answer.
//!
//! An exercise is created `Pending` and transitions to `Scored` exactly once.
//! There is no way back and no retry in place; a new attempt is a new
//! exercise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  direction::Direction,
  id::{ExerciseId, WordId},
  score::Score,
};

/// The lifecycle state of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExerciseStatus {
  Pending,
  Scored {
    user_answer: String,
    score:       Score,
    feedback:    String,
    scored_at:   DateTime<Utc>,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id:                 ExerciseId,
  pub word_id:            WordId,
  pub direction:          Direction,
  /// The word's term when the exercise was generated. Later edits to the
  /// word do not touch it.
  pub source_term:        String,
  pub source_translation: String,
  pub sentence:           String,
  #[serde(flatten)]
  pub status:             ExerciseStatus,
  pub created_at:         DateTime<Utc>,
}

impl Exercise {
  pub fn is_scored(&self) -> bool {
    matches!(self.status, ExerciseStatus::Scored { .. })
  }

  /// The learner's answer; empty while pending.
  pub fn user_answer(&self) -> &str {
    match &self.status {
      ExerciseStatus::Scored { user_answer, .. } => user_answer,
      ExerciseStatus::Pending => "",
    }
  }

  pub fn score(&self) -> Option<Score> {
    match &self.status {
      ExerciseStatus::Scored { score, .. } => Some(*score),
      ExerciseStatus::Pending => None,
    }
  }

  pub fn feedback(&self) -> Option<&str> {
    match &self.status {
      ExerciseStatus::Scored { feedback, .. } => Some(feedback),
      ExerciseStatus::Pending => None,
    }
  }
}

/// Input to [`crate::store::VocabStore::insert_exercise`].
#[derive(Debug, Clone)]
pub struct NewExercise {
  pub word_id:            WordId,
  pub direction:          Direction,
  pub source_term:        String,
  pub source_translation: String,
  pub sentence:           String,
}

/// Input to [`crate::store::VocabStore::record_answer`]. The `scored_at`
/// timestamp is set by the store.
#[derive(Debug, Clone)]
pub struct ScoredAnswer {
  pub user_answer: String,
  pub score:       Score,
  pub feedback:    String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pending() -> Exercise {
    Exercise {
      id:                 ExerciseId(1),
      word_id:            WordId(1),
      direction:          Direction::TowardTarget,
      source_term:        "ubiquitous".into(),
      source_translation: "her yerde bulunan".into(),
      sentence:           "Akıllı telefonlar artık her yerde bulunan cihazlar.".into(),
      status:             ExerciseStatus::Pending,
      created_at:         Utc::now(),
    }
  }

  #[test]
  fn pending_exercise_has_no_answer() {
    let ex = pending();
    assert!(!ex.is_scored());
    assert_eq!(ex.user_answer(), "");
    assert_eq!(ex.score(), None);
    assert_eq!(ex.feedback(), None);
  }

  #[test]
  fn status_tag_is_flattened() {
    let json = serde_json::to_value(pending()).unwrap();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["direction"], "toward_target");
  }
}
