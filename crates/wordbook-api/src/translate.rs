//! `POST /translate`.
//!
//! Always answers 200: translation failures come back as readable text in
//! `translation`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use wordbook_core::{grader::Grader, store::VocabStore, translate::Translator};

use crate::{ApiState, error::ApiError};

/// Language codes used when a request does not name its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCodes {
  pub source: String,
  pub target: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateBody {
  pub text:        String,
  pub source_lang: Option<String>,
  pub target_lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
  pub text:        String,
  pub translation: String,
}

pub async fn handler<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Json(body): Json<TranslateBody>,
) -> Result<Json<TranslateResponse>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  let source = body.source_lang.as_deref().unwrap_or(&state.languages.source);
  let target = body.target_lang.as_deref().unwrap_or(&state.languages.target);

  let translation = state.translator.translate(source, target, &body.text).await;
  Ok(Json(TranslateResponse { text: body.text, translation }))
}
