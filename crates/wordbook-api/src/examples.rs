//! Handlers for `/words/:id/examples`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/words/:id/examples` | Newest first |
//! | `POST` | `/words/:id/examples` | Body: `{"text":"..."}`; returns 201 + a manual example |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use wordbook_core::{
  example::Example, grader::Grader, id::WordId, store::VocabStore, translate::Translator,
};

use crate::{ApiState, error::ApiError};

/// `GET /words/:id/examples`
pub async fn list<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(word_id): Path<WordId>,
) -> Result<Json<Vec<Example>>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.list_examples(word_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub text: String,
}

/// `POST /words/:id/examples`
pub async fn create<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(word_id): Path<WordId>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  let example = state.service.add_manual_example(word_id, &body.text).await?;
  Ok((StatusCode::CREATED, Json(example)))
}
