//! The `VocabStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `wordbook-store-sqlite`).
//! The workflow service depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  example::{Example, NewExample},
  exercise::{Exercise, NewExercise, ScoredAnswer},
  id::{ExerciseId, WordId},
  word::{NewWord, Word},
};

/// A write refused because of what is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
  /// Another word already has the same term, compared case-insensitively.
  DuplicateTerm,
  /// The exercise was scored before this answer arrived.
  AlreadyScored(ExerciseId),
}

/// Error bound for [`VocabStore`] backends.
///
/// Conflicts are exposed so the caller can tell a lost race apart from a
/// storage failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn conflict(&self) -> Option<Conflict>;
}

/// Abstraction over a Wordbook storage backend.
///
/// Examples are append-only. Exercises are written once and updated once, by
/// [`VocabStore::record_answer`]. Words are mutable; deleting a word removes
/// its examples and exercises.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait VocabStore: Send + Sync {
  type Error: StoreError;

  // ── Words ─────────────────────────────────────────────────────────────

  /// Persist a new word. Fails with [`Conflict::DuplicateTerm`] if a word
  /// with the same term (compared case-insensitively) already exists.
  fn insert_word(
    &self,
    input: NewWord,
  ) -> impl Future<Output = Result<Word, Self::Error>> + Send + '_;

  /// Retrieve a word by id. Returns `None` if not found.
  fn get_word(
    &self,
    id: WordId,
  ) -> impl Future<Output = Result<Option<Word>, Self::Error>> + Send + '_;

  /// Case-insensitive exact match on the term.
  fn find_word_by_term<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Option<Word>, Self::Error>> + Send + 'a;

  /// Newest first by creation time, then by id.
  fn list_words(
    &self,
    include_learned: bool,
  ) -> impl Future<Output = Result<Vec<Word>, Self::Error>> + Send + '_;

  /// Distinct non-empty group labels, sorted case-insensitively.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn update_translation<'a>(
    &'a self,
    id: WordId,
    translation: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn update_notes<'a>(
    &'a self,
    id: WordId,
    notes: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn update_group(
    &self,
    id: WordId,
    group: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set the learned flag and stamp `learned_at`.
  fn mark_learned(
    &self,
    id: WordId,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Clear the learned flag and `learned_at` together.
  fn unmark_learned(
    &self,
    id: WordId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a word with its examples and exercises. Returns `false` if the
  /// word did not exist.
  fn delete_word(
    &self,
    id: WordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Examples (append-only) ────────────────────────────────────────────

  fn insert_example(
    &self,
    input: NewExample,
  ) -> impl Future<Output = Result<Example, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_examples(
    &self,
    word_id: WordId,
  ) -> impl Future<Output = Result<Vec<Example>, Self::Error>> + Send + '_;

  /// Arithmetic mean of the word's scored examples, or `0.0` when there are
  /// none.
  fn average_score(
    &self,
    word_id: WordId,
  ) -> impl Future<Output = Result<f64, Self::Error>> + Send + '_;

  // ── Exercises ─────────────────────────────────────────────────────────

  fn insert_exercise(
    &self,
    input: NewExercise,
  ) -> impl Future<Output = Result<Exercise, Self::Error>> + Send + '_;

  fn get_exercise(
    &self,
    id: ExerciseId,
  ) -> impl Future<Output = Result<Option<Exercise>, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_exercises(
    &self,
    word_id: WordId,
  ) -> impl Future<Output = Result<Vec<Exercise>, Self::Error>> + Send + '_;

  /// Move a pending exercise to scored and return the updated row.
  ///
  /// Returns an error if the exercise does not exist, and one reporting
  /// [`Conflict::AlreadyScored`] if it is already scored.
  fn record_answer(
    &self,
    id: ExerciseId,
    answer: ScoredAnswer,
  ) -> impl Future<Output = Result<Exercise, Self::Error>> + Send + '_;
}
