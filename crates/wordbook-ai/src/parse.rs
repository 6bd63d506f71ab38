//! Parsing of grader replies.
//!
//! Models are asked for strict JSON but do not always comply. A reply is
//! read as a JSON object if one can be found, otherwise as free text carrying
//! an `N/10` score, otherwise it is unusable.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use wordbook_core::score::Score;

static SCORE_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(-?\d{1,3})\s*/\s*10\b").expect("valid score pattern"));

/// What could be recovered from a grader reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeReport {
  Structured { score: Score, feedback: String, suggestion: Option<String> },
  PatternMatched { score: Score },
  Unparseable,
}

impl GradeReport {
  pub fn parse(raw: &str) -> Self {
    let text = strip_json_fences(raw);

    if let Some(report) = json_object(text).and_then(|obj| structured(&obj)) {
      return report;
    }

    SCORE_PATTERN
      .captures(text)
      .and_then(|caps| caps[1].parse::<i64>().ok())
      .map(|n| Self::PatternMatched { score: Score::clamped(n) })
      .unwrap_or(Self::Unparseable)
  }
}

/// Strip a surrounding markdown code fence, with or without a language tag.
pub fn strip_json_fences(s: &str) -> &str {
  let s = s.trim();
  let Some(rest) = s.strip_prefix("```") else {
    return s;
  };
  let rest = rest.strip_prefix("json").unwrap_or(rest);
  rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// The span from the first `{` to the last `}`, if it parses as an object.
fn json_object(text: &str) -> Option<Map<String, Value>> {
  let start = text.find('{')?;
  let end = text.rfind('}')?;
  if end < start {
    return None;
  }
  match serde_json::from_str(&text[start..=end]) {
    Ok(Value::Object(map)) => Some(map),
    _ => None,
  }
}

fn structured(obj: &Map<String, Value>) -> Option<GradeReport> {
  let score = match obj.get("score") {
    None | Some(Value::Null) => 0,
    Some(value) => numeric(value)?,
  };

  let feedback = first_text(obj, &["feedback", "feedback_tr"]).unwrap_or_default();
  let suggestion = first_text(obj, &["better", "suggested"]);

  Some(GradeReport::Structured { score: Score::clamped(score), feedback, suggestion })
}

/// Integer value of a JSON number or numeric string, truncated toward zero.
fn numeric(value: &Value) -> Option<i64> {
  let n = match value {
    Value::Number(n) => n.as_f64()?,
    Value::String(s) => s.trim().parse::<f64>().ok()?,
    _ => return None,
  };
  n.is_finite().then_some(n.trunc() as i64)
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
  keys
    .iter()
    .filter_map(|k| obj.get(*k))
    .filter_map(|v| match v {
      Value::String(s) => Some(s.trim().to_owned()),
      Value::Null => None,
      other => Some(other.to_string()),
    })
    .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn score(n: u8) -> Score { Score::clamped(n as i64) }

  #[test]
  fn strict_json() {
    let report = GradeReport::parse(r#"{"score": 8, "feedback": "Good.", "better": "Hi there."}"#);
    assert_eq!(report, GradeReport::Structured {
      score:      score(8),
      feedback:   "Good.".into(),
      suggestion: Some("Hi there.".into()),
    });
  }

  #[test]
  fn fenced_json_with_aliases_and_string_score() {
    let raw = "```json\n{\"score\": \"6.5\", \"feedback_tr\": \"İyi\", \"suggested\": \"x\"}\n```";
    assert_eq!(GradeReport::parse(raw), GradeReport::Structured {
      score:      score(6),
      feedback:   "İyi".into(),
      suggestion: Some("x".into()),
    });
  }

  #[test]
  fn json_embedded_in_prose() {
    let raw = "Sure! Here is the verdict: {\"score\": 15, \"feedback\": \"\"} Hope it helps.";
    assert_eq!(GradeReport::parse(raw), GradeReport::Structured {
      score:      score(10),
      feedback:   String::new(),
      suggestion: None,
    });
  }

  #[test]
  fn missing_score_defaults_to_zero() {
    let report = GradeReport::parse(r#"{"feedback": "No idea."}"#);
    assert!(matches!(report, GradeReport::Structured { score, .. } if score.get() == 0));
  }

  #[test]
  fn pattern_fallback() {
    assert_eq!(GradeReport::parse("I would say 7/10, decent."), GradeReport::PatternMatched {
      score: score(7),
    });
    assert_eq!(GradeReport::parse("score: -3 / 10"), GradeReport::PatternMatched { score: score(0) });
  }

  #[test]
  fn non_numeric_score_falls_back_to_pattern() {
    let raw = r#"{"score": "high", "feedback": "ok"} roughly 9/10"#;
    assert_eq!(GradeReport::parse(raw), GradeReport::PatternMatched { score: score(9) });
  }

  #[test]
  fn nothing_usable() {
    assert_eq!(GradeReport::parse("I cannot grade this."), GradeReport::Unparseable);
    assert_eq!(GradeReport::parse(""), GradeReport::Unparseable);
  }
}
