//! [`SqliteStore`]: the SQLite implementation of [`VocabStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, types::Value};
use tracing::{debug, info};

use wordbook_core::{
  example::{Example, NewExample, Provenance},
  exercise::{Exercise, ExerciseStatus, NewExercise, ScoredAnswer},
  id::{ExampleId, ExerciseId, WordId},
  store::VocabStore,
  word::{NewWord, Word, term_key},
};

use crate::{
  Error, Result,
  encode::{
    EXAMPLE_COLUMNS, EXERCISE_COLUMNS, RawExample, RawExercise, RawWord, WORD_COLUMNS,
    encode_direction, encode_dt, now,
  },
  schema::{CONNECTION_PRAGMAS, SCHEMA_VERSION, migrate},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Wordbook store backed by a single SQLite file.
///
/// Construct it once at startup and share it; cloning is cheap because the
/// inner connection handle is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and migrate it to the current schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// The schema version recorded in the database file.
  pub async fn schema_version(&self) -> Result<i64> {
    let version = self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
      .await?;
    Ok(version)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        Ok(())
      })
      .await?;

    let current = self.schema_version().await?;
    if current > SCHEMA_VERSION {
      return Err(Error::SchemaTooNew { found: current, supported: SCHEMA_VERSION });
    }

    let applied = self.conn.call(move |conn| Ok(migrate(conn, current)?)).await?;
    if applied > 0 {
      info!(from = current, to = SCHEMA_VERSION, "migrated wordbook schema");
    } else {
      debug!(version = current, "wordbook schema up to date");
    }
    Ok(())
  }

  /// Run a word `UPDATE`, mapping "no row touched" to [`Error::WordNotFound`].
  /// `?1` is always the word id; `values` bind `?2` onwards.
  async fn update_word_row(&self, id: WordId, sql: &'static str, values: Vec<Value>) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        let params = std::iter::once(Value::Integer(id.get())).chain(values);
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::WordNotFound(id));
    }
    Ok(())
  }
}

fn word_exists(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM words WHERE id = ?1", [id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

// ─── VocabStore impl ─────────────────────────────────────────────────────────

impl VocabStore for SqliteStore {
  type Error = Error;

  // ── Words ─────────────────────────────────────────────────────────────────

  async fn insert_word(&self, input: NewWord) -> Result<Word> {
    let created_at = now();
    let key        = term_key(&input.term);
    let term       = input.term.clone();
    let at_str     = encode_dt(created_at);
    let group      = input.group.clone();
    let trans      = input.translation.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row("SELECT 1 FROM words WHERE term_key = ?1", [&key], |_| Ok(()))
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO words (term, term_key, translation, group_title, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![term, key, trans, group, at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let id = id.ok_or_else(|| Error::DuplicateTerm(input.term.clone()))?;

    Ok(Word {
      id:          WordId(id),
      term:        input.term,
      translation: input.translation,
      notes:       String::new(),
      group:       input.group,
      learned_at:  None,
      created_at,
    })
  }

  async fn get_word(&self, id: WordId) -> Result<Option<Word>> {
    let raw: Option<RawWord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"),
              [id.get()],
              RawWord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWord::into_word).transpose()
  }

  async fn find_word_by_term(&self, term: &str) -> Result<Option<Word>> {
    let key = term_key(term);

    let raw: Option<RawWord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {WORD_COLUMNS} FROM words WHERE term_key = ?1"),
              [key],
              RawWord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWord::into_word).transpose()
  }

  async fn list_words(&self, include_learned: bool) -> Result<Vec<Word>> {
    let raws: Vec<RawWord> = self
      .conn
      .call(move |conn| {
        let filter = if include_learned { "" } else { "WHERE is_learned = 0" };
        let mut stmt = conn.prepare(&format!(
          "SELECT {WORD_COLUMNS} FROM words {filter} ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawWord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWord::into_word).collect()
  }

  async fn list_groups(&self) -> Result<Vec<String>> {
    let groups = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT group_title FROM words
           WHERE group_title IS NOT NULL AND group_title != ''
           ORDER BY group_title COLLATE NOCASE",
        )?;
        let rows = stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(groups)
  }

  async fn update_translation(&self, id: WordId, translation: &str) -> Result<()> {
    self
      .update_word_row(
        id,
        "UPDATE words SET translation = ?2 WHERE id = ?1",
        vec![Value::from(translation.to_owned())],
      )
      .await
  }

  async fn update_notes(&self, id: WordId, notes: &str) -> Result<()> {
    self
      .update_word_row(
        id,
        "UPDATE words SET notes = ?2 WHERE id = ?1",
        vec![Value::from(notes.to_owned())],
      )
      .await
  }

  async fn update_group(&self, id: WordId, group: Option<String>) -> Result<()> {
    self
      .update_word_row(
        id,
        "UPDATE words SET group_title = ?2 WHERE id = ?1",
        vec![group.map_or(Value::Null, Value::Text)],
      )
      .await
  }

  async fn mark_learned(&self, id: WordId, at: DateTime<Utc>) -> Result<()> {
    // An already-learned word keeps its original timestamp.
    self
      .update_word_row(
        id,
        "UPDATE words SET is_learned = 1, learned_at = COALESCE(learned_at, ?2) WHERE id = ?1",
        vec![Value::Text(encode_dt(at))],
      )
      .await
  }

  async fn unmark_learned(&self, id: WordId) -> Result<()> {
    self
      .update_word_row(
        id,
        "UPDATE words SET is_learned = 0, learned_at = NULL WHERE id = ?1",
        Vec::new(),
      )
      .await
  }

  async fn delete_word(&self, id: WordId) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM words WHERE id = ?1", [id.get()])?))
      .await?;
    Ok(changed > 0)
  }

  // ── Examples (append-only) ────────────────────────────────────────────────

  async fn insert_example(&self, input: NewExample) -> Result<Example> {
    let created_at = now();
    let word_id    = input.word_id;
    let text       = input.text.clone();
    let feedback   = input.feedback.clone();
    let at_str     = encode_dt(created_at);

    let (origin, direction, score, exercise_id) = match &input.provenance {
      Provenance::Manual => ("MANUAL", None, None, None),
      Provenance::Scored { exercise_id, direction, score } => (
        "AI",
        Some(encode_direction(*direction)),
        Some(i64::from(score.get())),
        Some(exercise_id.get()),
      ),
    };

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        if !word_exists(conn, word_id.get())? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO examples (
             word_id, text, origin, direction, score, feedback, exercise_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            word_id.get(),
            text,
            origin,
            direction,
            score,
            feedback,
            exercise_id,
            at_str,
          ],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let id = id.ok_or(Error::WordNotFound(word_id))?;

    Ok(Example {
      id:         ExampleId(id),
      word_id,
      text:       input.text,
      feedback:   input.feedback,
      provenance: input.provenance,
      created_at,
    })
  }

  async fn list_examples(&self, word_id: WordId) -> Result<Vec<Example>> {
    let raws: Vec<RawExample> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EXAMPLE_COLUMNS} FROM examples
           WHERE word_id = ?1
           ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([word_id.get()], RawExample::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExample::into_example).collect()
  }

  async fn average_score(&self, word_id: WordId) -> Result<f64> {
    let avg: Option<f64> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(score) FROM examples WHERE word_id = ?1 AND score IS NOT NULL",
          [word_id.get()],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(avg.unwrap_or(0.0))
  }

  // ── Exercises ─────────────────────────────────────────────────────────────

  async fn insert_exercise(&self, input: NewExercise) -> Result<Exercise> {
    let created_at  = now();
    let word_id     = input.word_id;
    let direction   = encode_direction(input.direction);
    let term        = input.source_term.clone();
    let translation = input.source_translation.clone();
    let sentence    = input.sentence.clone();
    let at_str      = encode_dt(created_at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        if !word_exists(conn, word_id.get())? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO exercises (
             word_id, direction, source_term, source_translation, sentence, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![word_id.get(), direction, term, translation, sentence, at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let id = id.ok_or(Error::WordNotFound(word_id))?;

    Ok(Exercise {
      id: ExerciseId(id),
      word_id,
      direction: input.direction,
      source_term: input.source_term,
      source_translation: input.source_translation,
      sentence: input.sentence,
      status: ExerciseStatus::Pending,
      created_at,
    })
  }

  async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>> {
    let raw: Option<RawExercise> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ?1"),
              [id.get()],
              RawExercise::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawExercise::into_exercise).transpose()
  }

  async fn list_exercises(&self, word_id: WordId) -> Result<Vec<Exercise>> {
    let raws: Vec<RawExercise> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EXERCISE_COLUMNS} FROM exercises
           WHERE word_id = ?1
           ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([word_id.get()], RawExercise::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExercise::into_exercise).collect()
  }

  async fn record_answer(&self, id: ExerciseId, answer: ScoredAnswer) -> Result<Exercise> {
    let at_str = encode_dt(now());
    let score  = i64::from(answer.score.get());

    // `None` = no such exercise, `Some(false)` = already scored.
    let outcome: Option<bool> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE exercises
           SET user_answer = ?2, score = ?3, feedback = ?4, scored_at = ?5
           WHERE id = ?1 AND score IS NULL",
          rusqlite::params![id.get(), answer.user_answer, score, answer.feedback, at_str],
        )?;
        if changed > 0 {
          return Ok(Some(true));
        }
        let exists = conn
          .query_row("SELECT 1 FROM exercises WHERE id = ?1", [id.get()], |_| Ok(()))
          .optional()?
          .is_some();
        Ok(exists.then_some(false))
      })
      .await?;

    match outcome {
      None => Err(Error::ExerciseNotFound(id)),
      Some(false) => Err(Error::AlreadyScored(id)),
      Some(true) => self.get_exercise(id).await?.ok_or(Error::ExerciseNotFound(id)),
    }
  }
}
