//! Core types and trait definitions for the Wordbook vocabulary trainer.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; the storage backend, the AI client and the
//! workflow service meet here through the [`store::VocabStore`],
//! [`grader::Grader`] and [`translate::Translator`] traits.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod direction;
pub mod error;
pub mod example;
pub mod exercise;
pub mod grader;
pub mod id;
pub mod learned;
pub mod score;
pub mod store;
pub mod translate;
pub mod word;

pub use error::{Error, Result};
