//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that `ORDER BY created_at` is chronological.
//! Enum tokens are the `strum` representations from `wordbook-core`.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use wordbook_core::{
  direction::Direction,
  example::{Example, Origin, Provenance},
  exercise::{Exercise, ExerciseStatus},
  id::{ExampleId, ExerciseId, WordId},
  score::Score,
  word::Word,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Current time truncated to what the column can hold, so values handed back
/// to callers equal what a later read returns.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── Enum tokens ─────────────────────────────────────────────────────────────

pub fn encode_direction(d: Direction) -> &'static str {
  match d {
    Direction::TowardTarget => "toward_target",
    Direction::TowardSource => "toward_source",
  }
}

pub fn decode_direction(s: &str) -> Result<Direction> {
  Direction::from_str(s)
    .map_err(|_| wordbook_core::Error::UnknownDirection(s.to_owned()).into())
}

pub fn decode_origin(s: &str) -> Result<Origin> {
  Origin::from_str(s).map_err(|_| wordbook_core::Error::UnknownOrigin(s.to_owned()).into())
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const WORD_COLUMNS: &str =
  "id, term, translation, notes, group_title, learned_at, created_at";

/// Raw values read directly from a `words` row.
pub struct RawWord {
  pub id:          i64,
  pub term:        String,
  pub translation: String,
  pub notes:       String,
  pub group_title: Option<String>,
  pub learned_at:  Option<String>,
  pub created_at:  String,
}

impl RawWord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      term:        row.get(1)?,
      translation: row.get(2)?,
      notes:       row.get(3)?,
      group_title: row.get(4)?,
      learned_at:  row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_word(self) -> Result<Word> {
    Ok(Word {
      id:          WordId(self.id),
      term:        self.term,
      translation: self.translation,
      notes:       self.notes,
      group:       self.group_title,
      learned_at:  self.learned_at.as_deref().map(decode_dt).transpose()?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const EXAMPLE_COLUMNS: &str =
  "id, word_id, text, origin, direction, score, feedback, exercise_id, created_at";

/// Raw values read directly from an `examples` row.
pub struct RawExample {
  pub id:          i64,
  pub word_id:     i64,
  pub text:        String,
  pub origin:      String,
  pub direction:   Option<String>,
  pub score:       Option<i64>,
  pub feedback:    String,
  pub exercise_id: Option<i64>,
  pub created_at:  String,
}

impl RawExample {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      word_id:     row.get(1)?,
      text:        row.get(2)?,
      origin:      row.get(3)?,
      direction:   row.get(4)?,
      score:       row.get(5)?,
      feedback:    row.get(6)?,
      exercise_id: row.get(7)?,
      created_at:  row.get(8)?,
    })
  }

  pub fn into_example(self) -> Result<Example> {
    let provenance = match decode_origin(&self.origin)? {
      Origin::Manual => Provenance::Manual,
      Origin::Ai => {
        // The table CHECK guarantees all three are present for AI rows.
        let (Some(direction), Some(score), Some(exercise_id)) =
          (self.direction, self.score, self.exercise_id)
        else {
          return Err(wordbook_core::Error::UnknownOrigin(self.origin).into());
        };
        Provenance::Scored {
          exercise_id: ExerciseId(exercise_id),
          direction:   decode_direction(&direction)?,
          score:       Score::new(score)?,
        }
      }
    };

    Ok(Example {
      id: ExampleId(self.id),
      word_id: WordId(self.word_id),
      text: self.text,
      feedback: self.feedback,
      provenance,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const EXERCISE_COLUMNS: &str = "id, word_id, direction, source_term, source_translation, \
                                    sentence, user_answer, score, feedback, scored_at, created_at";

/// Raw values read directly from an `exercises` row.
pub struct RawExercise {
  pub id:                 i64,
  pub word_id:            i64,
  pub direction:          String,
  pub source_term:        String,
  pub source_translation: String,
  pub sentence:           String,
  pub user_answer:        String,
  pub score:              Option<i64>,
  pub feedback:           Option<String>,
  pub scored_at:          Option<String>,
  pub created_at:         String,
}

impl RawExercise {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      word_id:            row.get(1)?,
      direction:          row.get(2)?,
      source_term:        row.get(3)?,
      source_translation: row.get(4)?,
      sentence:           row.get(5)?,
      user_answer:        row.get(6)?,
      score:              row.get(7)?,
      feedback:           row.get(8)?,
      scored_at:          row.get(9)?,
      created_at:         row.get(10)?,
    })
  }

  pub fn into_exercise(self) -> Result<Exercise> {
    let status = match (self.score, self.scored_at) {
      (Some(score), Some(scored_at)) => ExerciseStatus::Scored {
        user_answer: self.user_answer,
        score:       Score::new(score)?,
        feedback:    self.feedback.unwrap_or_default(),
        scored_at:   decode_dt(&scored_at)?,
      },
      _ => ExerciseStatus::Pending,
    };

    Ok(Exercise {
      id: ExerciseId(self.id),
      word_id: WordId(self.word_id),
      direction: decode_direction(&self.direction)?,
      source_term: self.source_term,
      source_translation: self.source_translation,
      sentence: self.sentence,
      status,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
