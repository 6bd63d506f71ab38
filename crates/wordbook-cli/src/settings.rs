//! Runtime settings, read from an optional TOML file and `WORDBOOK_*`
//! environment variables (environment wins).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context as _, Result, bail};
use serde::Deserialize;
use wordbook_ai::{CompletionConfig, Language, Languages, config as ai};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path: PathBuf,

  // Completion API (OpenRouter or any OpenAI-compatible endpoint).
  pub api_key:        String,
  pub base_url:       String,
  pub model:          String,
  pub fallback_model: Option<String>,
  pub timeout_secs:   u64,
  pub max_retries:    u32,
  pub backoff_ms:     u64,

  // DeepL.
  pub deepl_api_key:  String,
  pub deepl_base_url: Option<String>,

  // Language pair.
  pub source_lang:       String,
  pub source_lang_name:  String,
  pub target_lang:       String,
  pub target_lang_name:  String,
  /// Language code for grader feedback; defaults to the target language.
  pub feedback_lang:     Option<String>,
  pub suggestion_label:  Option<String>,

  // `serve`.
  pub host: String,
  pub port: u16,
}

impl Default for Settings {
  fn default() -> Self {
    let langs = Languages::default();
    Self {
      store_path:       PathBuf::from("~/.local/share/wordbook/wordbook.db"),
      api_key:          String::new(),
      base_url:         ai::DEFAULT_BASE_URL.to_owned(),
      model:            ai::DEFAULT_MODEL.to_owned(),
      fallback_model:   Some(ai::DEFAULT_FALLBACK_MODEL.to_owned()),
      timeout_secs:     ai::DEFAULT_TIMEOUT.as_secs(),
      max_retries:      ai::DEFAULT_MAX_RETRIES,
      backoff_ms:       ai::DEFAULT_BACKOFF.as_millis() as u64,
      deepl_api_key:    String::new(),
      deepl_base_url:   None,
      source_lang:      langs.source.code,
      source_lang_name: langs.source.name,
      target_lang:      langs.target.code,
      target_lang_name: langs.target.name,
      feedback_lang:    None,
      suggestion_label: None,
      host:             "127.0.0.1".to_owned(),
      port:             8080,
    }
  }
}

impl Settings {
  pub fn load(file: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("WORDBOOK"))
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn languages(&self) -> Languages {
    Languages {
      source: Language::new(&self.source_lang, &self.source_lang_name),
      target: Language::new(&self.target_lang, &self.target_lang_name),
    }
  }

  /// The configured feedback language, if it is one of the pair.
  pub fn feedback_language(&self) -> Option<Language> {
    let code = self.feedback_lang.as_deref()?;
    let langs = self.languages();
    [langs.source, langs.target].into_iter().find(|l| l.code.eq_ignore_ascii_case(code))
  }

  pub fn completion(&self) -> CompletionConfig {
    CompletionConfig {
      api_key:        self.api_key.clone(),
      base_url:       self.base_url.clone(),
      model:          self.model.clone(),
      fallback_model: self.fallback_model.clone().filter(|m| !m.trim().is_empty()),
      timeout:        Duration::from_secs(self.timeout_secs),
      max_retries:    self.max_retries,
      backoff:        Duration::from_millis(self.backoff_ms),
    }
  }

  pub fn require_api_key(&self) -> Result<()> {
    if self.api_key.trim().is_empty() {
      bail!("no completion API key configured (set WORDBOOK_API_KEY or `api_key`)");
    }
    Ok(())
  }

  pub fn require_deepl_key(&self) -> Result<()> {
    if self.deepl_api_key.trim().is_empty() {
      bail!("no DeepL API key configured (set WORDBOOK_DEEPL_API_KEY or `deepl_api_key`)");
    }
    Ok(())
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_the_client_defaults() {
    let cfg = Settings::default().completion();
    assert_eq!(cfg.model, ai::DEFAULT_MODEL);
    assert_eq!(cfg.timeout, Duration::from_secs(20));
    assert_eq!(cfg.backoff, Duration::from_millis(1200));
    assert_eq!(cfg.models().len(), 2);
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("wordbook.toml");
    std::fs::write(&file, "model = \"other/model\"\nfallback_model = \"\"\nport = 9000\n").unwrap();

    let settings = Settings::load(&file).unwrap();
    assert_eq!(settings.model, "other/model");
    assert_eq!(settings.port, 9000);
    assert_eq!(settings.completion().models(), vec!["other/model"]);
  }

  #[test]
  fn missing_file_is_fine() {
    let settings = Settings::load(Path::new("/nonexistent/wordbook.toml")).unwrap();
    assert_eq!(settings.source_lang, "en");
  }

  #[test]
  fn feedback_language_must_be_in_the_pair() {
    let mut settings = Settings::default();
    assert_eq!(settings.feedback_language(), None);
    settings.feedback_lang = Some("EN".into());
    assert_eq!(settings.feedback_language().map(|l| l.name), Some("English".to_owned()));
    settings.feedback_lang = Some("de".into());
    assert_eq!(settings.feedback_language(), None);
  }

  #[test]
  fn tilde_is_expanded() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    assert_eq!(expand_tilde(Path::new("/abs.db")), PathBuf::from("/abs.db"));
  }
}
