//! [`Grader`] implementation on top of a chat-completion model.

use std::future::Future;

use tracing::{debug, warn};
use wordbook_core::{
  direction::Direction,
  grader::{Grade, Grader},
};

use crate::{
  Completion, CompletionClient, Error, Language, Languages, Result,
  parse::GradeReport,
  prompts::{self, GRADE_PARAMS, SENTENCE_PARAMS},
};

pub const DEFAULT_SUGGESTION_LABEL: &str = "Better phrasing";

/// Generates practice sentences and grades answers through `C`.
pub struct AiGrader<C = CompletionClient> {
  completion:        C,
  languages:         Languages,
  feedback_language: Option<Language>,
  suggestion_label:  String,
}

impl<C: Completion> AiGrader<C> {
  pub fn new(completion: C, languages: Languages) -> Self {
    Self {
      completion,
      languages,
      feedback_language: None,
      suggestion_label: DEFAULT_SUGGESTION_LABEL.to_owned(),
    }
  }

  /// Language the grader writes its feedback in. Defaults to the target
  /// language.
  pub fn with_feedback_language(mut self, language: Language) -> Self {
    self.feedback_language = Some(language);
    self
  }

  pub fn with_suggestion_label(mut self, label: impl Into<String>) -> Self {
    self.suggestion_label = label.into();
    self
  }

  pub fn languages(&self) -> &Languages { &self.languages }

  pub fn completion(&self) -> &C { &self.completion }

  fn feedback_language(&self) -> &Language {
    self.feedback_language.as_ref().unwrap_or(&self.languages.target)
  }

  /// Grader feedback followed by the suggested phrasing on its own line.
  fn combine_feedback(&self, direction: Direction, feedback: &str, suggestion: Option<&str>) -> String {
    let feedback = feedback.trim();
    let Some(better) = suggestion.map(str::trim).filter(|s| !s.is_empty()) else {
      return feedback.to_owned();
    };

    let line = format!(
      "{} ({}): {better}",
      self.suggestion_label,
      self.languages.answer_language(direction).code.to_uppercase()
    );
    if feedback.is_empty() { line } else { format!("{feedback}\n{line}") }
  }

  async fn sentence(&self, direction: Direction, term: &str, translation: &str) -> Result<String> {
    let messages = prompts::sentence_messages(&self.languages, direction, term, translation);
    let raw = self.completion.complete(&messages, SENTENCE_PARAMS).await?;

    let sentence = raw.trim().trim_matches(['"', '“', '”']).trim();
    if sentence.is_empty() {
      warn!(term, %direction, "model produced an empty sentence");
      return Err(Error::EmptySentence);
    }
    Ok(sentence.to_owned())
  }

  async fn grade(&self, direction: Direction, original: &str, answer: &str) -> Result<Grade> {
    let messages = prompts::grade_messages(
      &self.languages,
      self.feedback_language(),
      direction,
      original,
      answer,
    );
    let raw = self.completion.complete(&messages, GRADE_PARAMS).await?;

    match GradeReport::parse(&raw) {
      GradeReport::Structured { score, feedback, suggestion } => Ok(Grade {
        score,
        feedback: self.combine_feedback(direction, &feedback, suggestion.as_deref()),
      }),
      GradeReport::PatternMatched { score } => {
        debug!(%score, "grade recovered from free text");
        Ok(Grade { score, feedback: String::new() })
      }
      GradeReport::Unparseable => {
        warn!(raw = %raw, "grader reply had no usable score");
        Err(Error::Unparseable { raw })
      }
    }
  }
}

impl<C: Completion> Grader for AiGrader<C> {
  type Error = Error;

  fn generate_sentence<'a>(
    &'a self,
    direction: Direction,
    term: &'a str,
    translation: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a {
    self.sentence(direction, term, translation)
  }

  fn score_translation<'a>(
    &'a self,
    direction: Direction,
    original: &'a str,
    answer: &'a str,
  ) -> impl Future<Output = Result<Grade>> + Send + 'a {
    self.grade(direction, original, answer)
  }
}
