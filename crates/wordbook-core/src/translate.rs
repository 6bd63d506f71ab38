//! The translation capability used when adding a new word.

use std::future::Future;

/// A single blocking translation call with no retry.
///
/// Failures are reported as user-visible text in the returned string rather
/// than as errors, so a caller can always show the result as-is.
pub trait Translator: Send + Sync {
  fn translate<'a>(
    &'a self,
    source_lang: &'a str,
    target_lang: &'a str,
    text: &'a str,
  ) -> impl Future<Output = String> + Send + 'a;
}
