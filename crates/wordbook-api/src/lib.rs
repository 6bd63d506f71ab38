//! JSON REST API for Wordbook.
//!
//! Exposes an axum [`Router`] over a [`Service`] and a [`Translator`]. Auth,
//! TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", wordbook_api::api_router(state))
//! ```

pub mod error;
pub mod examples;
pub mod exercises;
pub mod translate;
pub mod words;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use wordbook_core::{grader::Grader, store::VocabStore, translate::Translator};
use wordbook_service::Service;

pub use error::ApiError;
pub use translate::LanguageCodes;

/// Shared state threaded through all handlers.
pub struct ApiState<S, G, T> {
  pub service:    Arc<Service<S, G>>,
  pub translator: Arc<T>,
  /// Defaults for `POST /translate` when the body names no languages.
  pub languages:  Arc<LanguageCodes>,
}

impl<S, G, T> Clone for ApiState<S, G, T> {
  fn clone(&self) -> Self {
    Self {
      service:    self.service.clone(),
      translator: self.translator.clone(),
      languages:  self.languages.clone(),
    }
  }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, G, T>(state: ApiState<S, G, T>) -> Router<()>
where
  S: VocabStore + 'static,
  G: Grader + 'static,
  T: Translator + 'static,
{
  Router::new()
    // Words
    .route("/words", get(words::list::<S, G, T>).post(words::upsert::<S, G, T>))
    .route("/words/{id}", get(words::get_one::<S, G, T>).delete(words::delete_one::<S, G, T>))
    .route("/words/{id}/notes", put(words::set_notes::<S, G, T>))
    .route("/words/{id}/group", put(words::set_group::<S, G, T>))
    .route("/words/{id}/learned", put(words::set_learned::<S, G, T>))
    .route("/words/{id}/average", get(words::average::<S, G, T>))
    .route("/groups", get(words::groups::<S, G, T>))
    // Examples
    .route(
      "/words/{id}/examples",
      get(examples::list::<S, G, T>).post(examples::create::<S, G, T>),
    )
    // Exercises
    .route(
      "/words/{id}/exercises",
      get(exercises::list::<S, G, T>).post(exercises::create::<S, G, T>),
    )
    .route("/exercises/{id}", get(exercises::get_one::<S, G, T>))
    .route("/exercises/{id}/answer", post(exercises::answer::<S, G, T>))
    // Translation
    .route("/translate", post(translate::handler::<S, G, T>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
