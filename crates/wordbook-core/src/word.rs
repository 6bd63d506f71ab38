//! A vocabulary entry and its learned state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::WordId;

/// A stored (term, translation) pair.
///
/// The learned flag is derived from `learned_at`, so a word can never be
/// learned without a timestamp or carry a timestamp while unlearned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
  pub id:          WordId,
  /// Source-language token, as typed by the user.
  pub term:        String,
  /// Target-language equivalent.
  pub translation: String,
  pub notes:       String,
  /// Free-form grouping label, e.g. the book or unit the word came from.
  pub group:       Option<String>,
  /// Set when the word is promoted to learned; cleared on manual demotion.
  pub learned_at:  Option<DateTime<Utc>>,
  pub created_at:  DateTime<Utc>,
}

impl Word {
  pub fn is_learned(&self) -> bool { self.learned_at.is_some() }
}

/// Input to [`crate::store::VocabStore::insert_word`].
#[derive(Debug, Clone)]
pub struct NewWord {
  pub term:        String,
  pub translation: String,
  pub group:       Option<String>,
}

impl NewWord {
  pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
    Self { term: term.into(), translation: translation.into(), group: None }
  }

  pub fn with_group(mut self, group: impl Into<String>) -> Self {
    self.group = Some(group.into());
    self
  }
}

/// Normalised lookup key for case-insensitive term matching.
pub fn term_key(term: &str) -> String { term.trim().to_lowercase() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn term_key_ignores_case_and_padding() {
    assert_eq!(term_key("  Ubiquitous "), "ubiquitous");
    assert_eq!(term_key("ÉCLAT"), term_key("éclat"));
  }
}
