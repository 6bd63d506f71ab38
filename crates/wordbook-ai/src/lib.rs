//! AI collaborators for Wordbook.
//!
//! - [`completion`]: an OpenAI-compatible chat-completion client with retry,
//!   backoff and model fallback.
//! - [`grader::AiGrader`]: the [`wordbook_core::grader::Grader`] built on it.
//! - [`deepl::DeepLTranslator`]: the [`wordbook_core::translate::Translator`]
//!   used when adding words.

#![allow(async_fn_in_trait)]

pub mod completion;
pub mod config;
pub mod deepl;
pub mod error;
pub mod grader;
pub mod parse;
pub mod prompts;

pub use completion::{Completion, CompletionClient, CompletionParams, Message, Role};
pub use config::{CompletionConfig, Language, Languages};
pub use deepl::DeepLTranslator;
pub use error::{Error, Result};
pub use grader::AiGrader;

#[cfg(test)]
mod tests;
