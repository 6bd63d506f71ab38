//! Word operations and the practice workflow.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use wordbook_core::{
  direction::Direction,
  example::{Example, NewExample},
  exercise::{Exercise, NewExercise, ScoredAnswer},
  grader::Grader,
  id::{ExerciseId, WordId},
  learned::{self, LearnedDecision},
  score::Score,
  store::{Conflict, StoreError, VocabStore},
  word::{NewWord, Word},
};

use crate::{Error, Result};

/// The outcome of a successful [`Service::evaluate_exercise`].
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
  pub score:    Score,
  /// Combined grader feedback, as stored on the exercise and the example.
  pub feedback: String,
  /// The scored example that was appended for the word.
  pub example:  Example,
  /// Whether this evaluation promoted the word to learned.
  pub promoted: bool,
}

/// Orchestrates a [`VocabStore`] and a [`Grader`].
///
/// Persistence effects of one call are ordered but not transactional.
pub struct Service<S, G> {
  store:  S,
  grader: G,
}

impl<S: VocabStore, G: Grader> Service<S, G> {
  pub fn new(store: S, grader: G) -> Self { Self { store, grader } }

  pub fn store(&self) -> &S { &self.store }

  pub fn grader(&self) -> &G { &self.grader }

  // ─── Words ──────────────────────────────────────────────────────────────

  /// Add a word, or update the existing word with the same term (compared
  /// case-insensitively). On update, an empty translation or a missing group
  /// leaves the stored value untouched; a new word must have a translation.
  pub async fn add_or_update(
    &self,
    term: &str,
    translation: &str,
    group: Option<&str>,
  ) -> Result<Word> {
    let term = term.trim();
    if term.is_empty() {
      return Err(Error::InvalidInput("term must not be empty".into()));
    }
    let translation = translation.trim();
    let group = group.map(str::trim).filter(|g| !g.is_empty());

    let existing = match self.store.find_word_by_term(term).await.map_err(Error::store)? {
      Some(existing) => existing,
      None => {
        if translation.is_empty() {
          return Err(Error::InvalidInput("a new word needs a translation".into()));
        }
        let mut input = NewWord::new(term, translation);
        input.group = group.map(str::to_owned);
        match self.store.insert_word(input).await {
          Ok(word) => {
            info!(word_id = %word.id, term, "word added");
            return Ok(word);
          }
          // Lost an insert race; the other writer's row is updated below.
          Err(e) if e.conflict() == Some(Conflict::DuplicateTerm) => {
            debug!(term, "term inserted concurrently");
            self
              .store
              .find_word_by_term(term)
              .await
              .map_err(Error::store)?
              .ok_or_else(|| Error::store(e))?
          }
          Err(e) => return Err(Error::store(e)),
        }
      }
    };

    if !translation.is_empty() && translation != existing.translation {
      self
        .store
        .update_translation(existing.id, translation)
        .await
        .map_err(Error::store)?;
    }
    if let Some(group) = group {
      if existing.group.as_deref() != Some(group) {
        self
          .store
          .update_group(existing.id, Some(group.to_owned()))
          .await
          .map_err(Error::store)?;
      }
    }

    debug!(word_id = %existing.id, term, "word already present, updated in place");
    self.get_word(existing.id).await
  }

  pub async fn get_word(&self, id: WordId) -> Result<Word> {
    self
      .store
      .get_word(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::WordNotFound(id))
  }

  pub async fn list_words(&self, include_learned: bool) -> Result<Vec<Word>> {
    self.store.list_words(include_learned).await.map_err(Error::store)
  }

  pub async fn list_groups(&self) -> Result<Vec<String>> {
    self.store.list_groups().await.map_err(Error::store)
  }

  pub async fn update_notes(&self, id: WordId, notes: &str) -> Result<Word> {
    self.get_word(id).await?;
    self.store.update_notes(id, notes).await.map_err(Error::store)?;
    self.get_word(id).await
  }

  /// Set or clear the group label. A blank label clears it.
  pub async fn update_group(&self, id: WordId, group: Option<&str>) -> Result<Word> {
    self.get_word(id).await?;
    let group = group.map(str::trim).filter(|g| !g.is_empty()).map(str::to_owned);
    self.store.update_group(id, group).await.map_err(Error::store)?;
    self.get_word(id).await
  }

  /// Manual learned toggle. This is the only way a word is ever demoted.
  pub async fn set_learned(&self, id: WordId, learned: bool) -> Result<Word> {
    self.get_word(id).await?;
    if learned {
      self.store.mark_learned(id, Utc::now()).await.map_err(Error::store)?;
    } else {
      self.store.unmark_learned(id).await.map_err(Error::store)?;
    }
    info!(word_id = %id, learned, "learned flag set manually");
    self.get_word(id).await
  }

  /// Delete a word together with its examples and exercises.
  pub async fn delete_word(&self, id: WordId) -> Result<()> {
    if self.store.delete_word(id).await.map_err(Error::store)? {
      info!(word_id = %id, "word deleted");
      Ok(())
    } else {
      Err(Error::WordNotFound(id))
    }
  }

  // ─── Examples ───────────────────────────────────────────────────────────

  /// Log a sentence by hand. It carries no score and does not move the
  /// average.
  pub async fn add_manual_example(&self, word_id: WordId, text: &str) -> Result<Example> {
    let text = text.trim();
    if text.is_empty() {
      return Err(Error::InvalidInput("example text must not be empty".into()));
    }
    self.get_word(word_id).await?;
    self
      .store
      .insert_example(NewExample::manual(word_id, text))
      .await
      .map_err(Error::store)
  }

  pub async fn list_examples(&self, word_id: WordId) -> Result<Vec<Example>> {
    self.get_word(word_id).await?;
    self.store.list_examples(word_id).await.map_err(Error::store)
  }

  pub async fn average_score(&self, word_id: WordId) -> Result<f64> {
    self.get_word(word_id).await?;
    self.store.average_score(word_id).await.map_err(Error::store)
  }

  // ─── Exercises ──────────────────────────────────────────────────────────

  pub async fn list_exercises(&self, word_id: WordId) -> Result<Vec<Exercise>> {
    self.get_word(word_id).await?;
    self.store.list_exercises(word_id).await.map_err(Error::store)
  }

  pub async fn get_exercise(&self, id: ExerciseId) -> Result<Exercise> {
    self
      .store
      .get_exercise(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ExerciseNotFound(id))
  }

  /// Generate a practice sentence for the word and persist it as a pending
  /// exercise. The word's current term and translation are copied onto the
  /// exercise.
  pub async fn create_exercise(&self, word_id: WordId, direction: Direction) -> Result<Exercise> {
    let word = self.get_word(word_id).await?;

    let sentence = self
      .grader
      .generate_sentence(direction, &word.term, &word.translation)
      .await
      .map_err(|e| Error::Generation(Box::new(e)))?;

    let exercise = self
      .store
      .insert_exercise(NewExercise {
        word_id,
        direction,
        source_term: word.term,
        source_translation: word.translation,
        sentence,
      })
      .await
      .map_err(Error::store)?;

    info!(%word_id, exercise_id = %exercise.id, %direction, "exercise created");
    Ok(exercise)
  }

  /// Grade `answer` against the exercise's sentence.
  ///
  /// On success the exercise is scored, a scored example is appended and the
  /// learned policy runs, in that order. A failure of the learned policy is
  /// logged and reported as `promoted: false`.
  pub async fn evaluate_exercise(&self, exercise_id: ExerciseId, answer: &str) -> Result<Evaluation> {
    let exercise = self.get_exercise(exercise_id).await?;

    let answer = answer.trim();
    if answer.is_empty() {
      return Err(Error::InvalidInput("answer must not be empty".into()));
    }
    if exercise.is_scored() {
      return Err(Error::AlreadyScored(exercise_id));
    }

    let grade = self
      .grader
      .score_translation(exercise.direction, &exercise.sentence, answer)
      .await
      .map_err(|e| Error::Grading(Box::new(e)))?;

    self
      .store
      .record_answer(exercise_id, ScoredAnswer {
        user_answer: answer.to_owned(),
        score:       grade.score,
        feedback:    grade.feedback.clone(),
      })
      .await
      .map_err(|e| match e.conflict() {
        Some(Conflict::AlreadyScored(id)) => Error::AlreadyScored(id),
        _ => Error::store(e),
      })?;

    let example = self
      .store
      .insert_example(NewExample::scored(
        exercise.word_id,
        answer,
        exercise_id,
        exercise.direction,
        grade.score,
        grade.feedback.clone(),
      ))
      .await
      .map_err(Error::store)?;

    let promoted = match self.apply_learned_policy(exercise.word_id).await {
      Ok(promoted) => promoted,
      Err(e) => {
        warn!(word_id = %exercise.word_id, error = %e, "learned-state update failed");
        false
      }
    };

    info!(%exercise_id, score = %grade.score, promoted, "exercise scored");
    Ok(Evaluation { score: grade.score, feedback: grade.feedback, example, promoted })
  }

  /// Promote the word if its average score is above the threshold. Returns
  /// whether a promotion happened.
  pub async fn apply_learned_policy(&self, word_id: WordId) -> Result<bool> {
    let word = self.get_word(word_id).await?;
    let average = self.store.average_score(word_id).await.map_err(Error::store)?;

    match learned::decide(word.is_learned(), average) {
      LearnedDecision::Promote => {
        self.store.mark_learned(word_id, Utc::now()).await.map_err(Error::store)?;
        info!(%word_id, average, "word promoted to learned");
        Ok(true)
      }
      LearnedDecision::Keep => Ok(false),
    }
  }
}
