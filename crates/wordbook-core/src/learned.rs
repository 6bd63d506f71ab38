//! Learned-state policy.
//!
//! A word is promoted once the mean of its scored examples is strictly above
//! [`LEARNED_THRESHOLD`]. Promotion is one-way: a falling average never
//! retracts mastery, only an explicit manual toggle does.

/// Strict lower bound on the average score for automatic promotion.
pub const LEARNED_THRESHOLD: f64 = 7.0;

/// Outcome of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnedDecision {
  Promote,
  Keep,
}

/// Decide whether a word transitions to learned.
///
/// An average of `0.0` means "no scored examples" and never promotes.
pub fn decide(is_learned: bool, average: f64) -> LearnedDecision {
  if !is_learned && average > LEARNED_THRESHOLD {
    LearnedDecision::Promote
  } else {
    LearnedDecision::Keep
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn threshold_is_strict() {
    assert_eq!(decide(false, 7.0), LearnedDecision::Keep);
    assert_eq!(decide(false, 7.01), LearnedDecision::Promote);
  }

  #[test]
  fn no_data_never_promotes() {
    assert_eq!(decide(false, 0.0), LearnedDecision::Keep);
  }

  #[test]
  fn never_demotes() {
    assert_eq!(decide(true, 2.0), LearnedDecision::Keep);
    assert_eq!(decide(true, 9.5), LearnedDecision::Keep);
  }
}
