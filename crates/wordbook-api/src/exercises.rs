//! Handlers for practice exercises.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/words/:id/exercises` | Newest first |
//! | `POST` | `/words/:id/exercises` | Body: `{"direction":"toward_target"}`; 201 + pending exercise |
//! | `GET`  | `/exercises/:id` | 404 if not found |
//! | `POST` | `/exercises/:id/answer` | Body: `{"answer":"..."}`; 409 if already scored |
//!
//! Both `POST`s call the grading model and answer 502 when it fails.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use wordbook_core::{
  direction::Direction,
  exercise::Exercise,
  grader::Grader,
  id::{ExerciseId, WordId},
  store::VocabStore,
  translate::Translator,
};
use wordbook_service::Evaluation;

use crate::{ApiState, error::ApiError};

/// `GET /words/:id/exercises`
pub async fn list<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(word_id): Path<WordId>,
) -> Result<Json<Vec<Exercise>>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.list_exercises(word_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub direction: Direction,
}

/// `POST /words/:id/exercises`
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
  let exercise = state.service.create_exercise(word_id, body.direction).await?;
  Ok((StatusCode::CREATED, Json(exercise)))
}

/// `GET /exercises/:id`
pub async fn get_one<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<ExerciseId>,
) -> Result<Json<Exercise>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.get_exercise(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
  pub answer: String,
}

/// `POST /exercises/:id/answer`
pub async fn answer<S, G, T>(
  State(state): State<ApiState<S, G, T>>,
  Path(id): Path<ExerciseId>,
  Json(body): Json<AnswerBody>,
) -> Result<Json<Evaluation>, ApiError>
where
  S: VocabStore,
  G: Grader,
  T: Translator,
{
  Ok(Json(state.service.evaluate_exercise(id, &body.answer).await?))
}
