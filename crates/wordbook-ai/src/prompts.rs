//! Prompt builders for sentence generation and grading.

use wordbook_core::direction::Direction;

use crate::{CompletionParams, Language, Languages, Message};

pub const SENTENCE_PARAMS: CompletionParams =
  CompletionParams { max_tokens: 128, temperature: 0.8 };

pub const GRADE_PARAMS: CompletionParams = CompletionParams { max_tokens: 200, temperature: 0.2 };

/// System message for grading calls.
pub const GRADER_SYSTEM: &str = "You are a precise bilingual grader. Return only JSON.";

/// A single user message asking for one advanced sentence that uses the word.
///
/// The word is given in both languages; the sentence must contain whichever
/// form belongs to the sentence language.
pub fn sentence_messages(
  languages: &Languages,
  direction: Direction,
  term: &str,
  translation: &str,
) -> Vec<Message> {
  let sentence_lang = languages.sentence_language(direction);
  let required = match direction {
    Direction::TowardTarget => translation,
    Direction::TowardSource => term,
  };

  let prompt = format!(
    "Write EXACTLY ONE {lang} sentence. No explanations.\n\
     Level: C2; 14-22 words; natural, idiomatic, advanced syntax; use a subordinate clause or \
     concessive structure.\n\
     Avoid clichés and named entities. Do not use quotes.\n\
     {source} word: '{term}'. Its {target} meaning: '{translation}'.\n\
     The sentence must include '{required}' and preserve its intended meaning.",
    lang = sentence_lang.name,
    source = languages.source.name,
    target = languages.target.name,
  );

  vec![Message::user(prompt)]
}

/// System and user messages asking for a strict `{score, feedback, better}`
/// JSON verdict.
pub fn grade_messages(
  languages: &Languages,
  feedback_language: &Language,
  direction: Direction,
  original: &str,
  answer: &str,
) -> Vec<Message> {
  let source_lang = languages.sentence_language(direction);
  let answer_lang = languages.answer_language(direction);

  let prompt = format!(
    "Evaluate the user's translation on adequacy (meaning preservation), fluency, and \
     naturalness.\n\
     Source ({src}): {original}\n\
     User translation ({dst}): {answer}\n\n\
     Return ONLY strict JSON with fields:\n  \
     'score': integer 0-10 (no text),\n  \
     'feedback': a short {fb} sentence explaining the main issue(s),\n  \
     'better': a more fluent/natural target-language version that preserves the meaning.\n\
     Give 'better' in {dst}.",
    src = source_lang.name,
    dst = answer_lang.name,
    fb = feedback_language.name,
  );

  vec![Message::system(GRADER_SYSTEM), Message::user(prompt)]
}
