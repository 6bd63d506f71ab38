//! Practice direction.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Which language a generated practice sentence is written in, and therefore
/// which language the learner must answer in.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  /// The sentence is in the target language; the answer is in the source
  /// language.
  #[strum(to_string = "toward_target", serialize = "target")]
  TowardTarget,
  /// The sentence is in the source language; the answer is in the target
  /// language.
  #[strum(to_string = "toward_source", serialize = "source")]
  TowardSource,
}

impl Direction {
  pub const ALL: [Direction; 2] = [Direction::TowardTarget, Direction::TowardSource];
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn tokens_match_serde_and_strum() {
    assert_eq!(Direction::TowardTarget.to_string(), "toward_target");
    assert_eq!(
      serde_json::to_string(&Direction::TowardSource).unwrap(),
      "\"toward_source\""
    );
    assert_eq!(Direction::TowardSource.as_ref(), "toward_source");
  }

  #[test]
  fn short_aliases_parse() {
    assert_eq!(Direction::from_str("target").unwrap(), Direction::TowardTarget);
    assert_eq!(Direction::from_str("toward_source").unwrap(), Direction::TowardSource);
    assert!(Direction::from_str("sideways").is_err());
  }
}
