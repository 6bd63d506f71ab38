//! Client configuration: endpoint, models, timeouts and the language pair.
//!
//! Values come from the binary's configuration layer; nothing here reads the
//! environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wordbook_core::direction::Direction;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_FALLBACK_MODEL: &str = "deepseek/deepseek-r1:free";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(1200);

/// Connection and retry settings for [`crate::CompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
  pub api_key:        String,
  pub base_url:       String,
  pub model:          String,
  /// Tried when the primary model is exhausted or answers with no content.
  pub fallback_model: Option<String>,
  /// Per-request timeout.
  pub timeout:        Duration,
  /// Retries per model after the first attempt.
  pub max_retries:    u32,
  /// Base delay; attempt `n` waits `backoff * (n + 1)`.
  pub backoff:        Duration,
}

impl CompletionConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:        api_key.into(),
      base_url:       DEFAULT_BASE_URL.to_owned(),
      model:          DEFAULT_MODEL.to_owned(),
      fallback_model: Some(DEFAULT_FALLBACK_MODEL.to_owned()),
      timeout:        DEFAULT_TIMEOUT,
      max_retries:    DEFAULT_MAX_RETRIES,
      backoff:        DEFAULT_BACKOFF,
    }
  }

  /// Models in the order they are tried. The fallback is skipped when it is
  /// unset, blank or the same as the primary.
  pub fn models(&self) -> Vec<&str> {
    let mut models = vec![self.model.as_str()];
    if let Some(fallback) = self.fallback_model.as_deref() {
      if !fallback.trim().is_empty() && fallback != self.model {
        models.push(fallback);
      }
    }
    models
  }
}

/// A language as presented to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
  /// Short code, e.g. `en`. Also used for the translation API.
  pub code: String,
  /// Display name used in prompts, e.g. `English`.
  pub name: String,
}

impl Language {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { code: code.into(), name: name.into() }
  }
}

/// The (source, target) pair a vocabulary is built on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Languages {
  pub source: Language,
  pub target: Language,
}

impl Default for Languages {
  fn default() -> Self {
    Self {
      source: Language::new("en", "English"),
      target: Language::new("tr", "Turkish"),
    }
  }
}

impl Languages {
  /// The language a practice sentence is written in.
  pub fn sentence_language(&self, direction: Direction) -> &Language {
    match direction {
      Direction::TowardTarget => &self.target,
      Direction::TowardSource => &self.source,
    }
  }

  /// The language the learner answers in.
  pub fn answer_language(&self, direction: Direction) -> &Language {
    match direction {
      Direction::TowardTarget => &self.source,
      Direction::TowardSource => &self.target,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fallback_equal_to_primary_is_skipped() {
    let mut cfg = CompletionConfig::new("k");
    assert_eq!(cfg.models(), vec![DEFAULT_MODEL, DEFAULT_FALLBACK_MODEL]);

    cfg.fallback_model = Some(DEFAULT_MODEL.to_owned());
    assert_eq!(cfg.models(), vec![DEFAULT_MODEL]);

    cfg.fallback_model = None;
    assert_eq!(cfg.models(), vec![DEFAULT_MODEL]);
  }

  #[test]
  fn directions_pick_opposite_languages() {
    let langs = Languages::default();
    assert_eq!(langs.sentence_language(Direction::TowardTarget).code, "tr");
    assert_eq!(langs.answer_language(Direction::TowardTarget).code, "en");
    assert_eq!(langs.sentence_language(Direction::TowardSource).code, "en");
    assert_eq!(langs.answer_language(Direction::TowardSource).code, "tr");
  }
}
