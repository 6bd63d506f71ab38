//! The Wordbook workflow: word operations, practice exercises and the
//! learned-state policy, over any [`wordbook_core::store::VocabStore`] and
//! [`wordbook_core::grader::Grader`].
//!
//! [`Service`] exposes every operation as an `async fn`. [`Dispatcher`] runs
//! the slow ones in the background and reports back over a channel.

pub mod dispatch;
pub mod error;
pub mod service;

pub use dispatch::{Command, Dispatcher, Event, Slot};
pub use error::{Error, Result};
pub use service::{Evaluation, Service};
