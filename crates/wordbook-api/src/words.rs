//! Handlers for `/words` and `/groups`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/words` | `?include_learned=false` hides learned words |
//! | `POST`   | `/words` | Body: [`UpsertBody`]; updates in place if the term exists |
//! | `GET`    | `/words/:id` | 404 if not found |
//! | `DELETE` | `/words/:id` | 204; removes examples and exercises too |
//! | `PUT`    | `/words/:id/notes` | Body: `{"notes":"..."}` |
//! | `PUT`    | `/words/:id/group` | Body: `{"group":"..."}`; `null` or blank clears |
//! | `PUT`    | `/words/:id/learned` | Body: `{"learned":true}` |
//! | `GET`    | `/words/:id/average` | Mean of scored examples |
//! | `GET`    | `/groups` | Distinct group labels |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};
use wordbook_core::{
  grader::Grader, id::WordId, store::VocabStore, translate::Translator, word::Word,
};

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default = "default_true")]
  pub include_learned: bool,
}

fn default_true() -> bool { true }

/// `GET /words[?include_learned=false]`
pub async fn list<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Word>>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.list_words(params.include_learned).await?))
}

// ─── Upsert ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpsertBody {
  pub term:        String,
  #[serde(default)]
  pub translation: String,
  pub group:       Option<String>,
}

/// `POST /words`
pub async fn upsert<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Json(body): Json<UpsertBody>,
) -> Result<Json<Word>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  let word = state
    .service
    .add_or_update(&body.term, &body.translation, body.group.as_deref())
    .await?;
  Ok(Json(word))
}

// ─── Get / delete ─────────────────────────────────────────────────────────────

/// `GET /words/:id`
pub async fn get_one<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<WordId>,
) -> Result<Json<Word>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.get_word(id).await?))
}

/// `DELETE /words/:id`
pub async fn delete_one<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<WordId>,
) -> Result<StatusCode, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  state.service.delete_word(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Edits ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NotesBody {
  pub notes: String,
}

/// `PUT /words/:id/notes`
pub async fn set_notes<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<WordId>,
  Json(body): Json<NotesBody>,
) -> Result<Json<Word>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.update_notes(id, &body.notes).await?))
}

#[derive(Debug, Deserialize)]
pub struct GroupBody {
  pub group: Option<String>,
}

/// `PUT /words/:id/group`
pub async fn set_group<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<WordId>,
  Json(body): Json<GroupBody>,
) -> Result<Json<Word>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.update_group(id, body.group.as_deref()).await?))
}

#[derive(Debug, Deserialize)]
pub struct LearnedBody {
  pub learned: bool,
}

/// `PUT /words/:id/learned`
pub async fn set_learned<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<WordId>,
  Json(body): Json<LearnedBody>,
) -> Result<Json<Word>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.set_learned(id, body.learned).await?))
}

// ─── Aggregates ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Average {
  pub word_id: WordId,
  pub average: f64,
}

/// `GET /words/:id/average`
pub async fn average<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<WordId>,
) -> Result<Json<Average>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  let average = state.service.average_score(id).await?;
  Ok(Json(Average { word_id: id, average }))
}

/// `GET /groups`
pub async fn groups<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.list_groups().await?))
}
