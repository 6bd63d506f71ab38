use std::{future::Future, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use wordbook_core::{
  direction::Direction,
  grader::{Grade, Grader},
  score::Score,
  translate::Translator,
};
use wordbook_service::Service;
use wordbook_store_sqlite::SqliteStore;

use super::*;

#[derive(Debug, thiserror::Error)]
#[error("model unavailable")]
struct Unavailable;

/// Scores every answer 8; refuses to write about "unspeakable".
struct FixedGrader;

impl Grader for FixedGrader {
  type Error = Unavailable;

  fn generate_sentence<'a>(
    &'a self,
    _direction: Direction,
    term: &'a str,
    _translation: &'a str,
  ) -> impl Future<Output = Result<String, Unavailable>> + Send + 'a {
    async move {
      if term == "unspeakable" {
        return Err(Unavailable);
      }
      Ok(format!("A sentence about {term}."))
    }
  }

  fn score_translation<'a>(
    &'a self,
    _direction: Direction,
    _original: &'a str,
    _answer: &'a str,
  ) -> impl Future<Output = Result<Grade, Unavailable>> + Send + 'a {
    async move { Ok(Grade { score: Score::clamped(8), feedback: "Nice.".into() }) }
  }
}

struct EchoTranslator;

impl Translator for EchoTranslator {
  fn translate<'a>(
    &'a self,
    source_lang: &'a str,
    target_lang: &'a str,
    text: &'a str,
  ) -> impl Future<Output = String> + Send + 'a {
    async move { format!("{text} ({source_lang}->{target_lang})") }
  }
}

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(ApiState {
    service:    Arc::new(Service::new(store, FixedGrader)),
    translator: Arc::new(EchoTranslator),
    languages:  Arc::new(LanguageCodes { source: "en".into(), target: "tr".into() }),
  })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(b) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(b.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

async fn add_word(app: &Router, term: &str) -> i64 {
  let (status, word) =
    send(app, "POST", "/words", Some(json!({ "term": term, "translation": "yaygın" }))).await;
  assert_eq!(status, StatusCode::OK);
  word["id"].as_i64().unwrap()
}

// ── Words ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_returns_the_same_word_for_the_same_term() {
  let app = app().await;
  let first = add_word(&app, "Ubiquitous").await;

  let (status, word) = send(
    &app,
    "POST",
    "/words",
    Some(json!({ "term": "ubiquitous", "translation": "her yerde bulunan", "group": "adj" })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(word["id"].as_i64(), Some(first));
  assert_eq!(word["translation"], "her yerde bulunan");

  let (_, words) = send(&app, "GET", "/words", None).await;
  assert_eq!(words.as_array().unwrap().len(), 1);

  let (_, groups) = send(&app, "GET", "/groups", None).await;
  assert_eq!(groups, json!(["adj"]));
}

#[tokio::test]
async fn blank_term_is_a_bad_request() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/words", Some(json!({ "term": "  " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn new_word_without_translation_is_a_bad_request() {
  let app = app().await;
  let (status, _) = send(&app, "POST", "/words", Some(json!({ "term": "ephemeral" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // An existing word may be re-posted without one.
  let id = add_word(&app, "ephemeral").await;
  let (status, word) = send(&app, "POST", "/words", Some(json!({ "term": "Ephemeral" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(word["id"].as_i64(), Some(id));
  assert_eq!(word["translation"], "yaygın");
}

#[tokio::test]
async fn unknown_ids_are_404() {
  let app = app().await;
  assert_eq!(send(&app, "GET", "/words/999", None).await.0, StatusCode::NOT_FOUND);
  assert_eq!(send(&app, "GET", "/exercises/999", None).await.0, StatusCode::NOT_FOUND);
  assert_eq!(send(&app, "DELETE", "/words/999", None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn learned_toggle_and_filter() {
  let app = app().await;
  let id = add_word(&app, "lucid").await;

  let (status, word) =
    send(&app, "PUT", &format!("/words/{id}/learned"), Some(json!({ "learned": true }))).await;
  assert_eq!(status, StatusCode::OK);
  assert!(word["learned_at"].is_string());

  let (_, open) = send(&app, "GET", "/words?include_learned=false", None).await;
  assert!(open.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_then_gone() {
  let app = app().await;
  let id = add_word(&app, "fleeting").await;

  assert_eq!(send(&app, "DELETE", &format!("/words/{id}"), None).await.0, StatusCode::NO_CONTENT);
  assert_eq!(send(&app, "GET", &format!("/words/{id}"), None).await.0, StatusCode::NOT_FOUND);
}

// ── Examples & exercises ─────────────────────────────────────────────────────

#[tokio::test]
async fn manual_example_is_created_without_a_score() {
  let app = app().await;
  let id = add_word(&app, "candid").await;

  let (status, example) = send(
    &app,
    "POST",
    &format!("/words/{id}/examples"),
    Some(json!({ "text": "She was candid about it." })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(example["origin"], "MANUAL");

  let (_, avg) = send(&app, "GET", &format!("/words/{id}/average"), None).await;
  assert_eq!(avg["average"], 0.0);
}

#[tokio::test]
async fn exercise_round_trip_and_conflict_on_second_answer() {
  let app = app().await;
  let id = add_word(&app, "ubiquitous").await;

  let (status, exercise) = send(
    &app,
    "POST",
    &format!("/words/{id}/exercises"),
    Some(json!({ "direction": "toward_source" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(exercise["status"], "pending");
  let ex_id = exercise["id"].as_i64().unwrap();

  let answer_uri = format!("/exercises/{ex_id}/answer");
  let (status, eval) =
    send(&app, "POST", &answer_uri, Some(json!({ "answer": "It was everywhere." }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(eval["score"], 8);
  assert_eq!(eval["promoted"], true);
  assert_eq!(eval["example"]["origin"], "AI");

  let (status, _) = send(&app, "POST", &answer_uri, Some(json!({ "answer": "again" }))).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, scored) = send(&app, "GET", &format!("/exercises/{ex_id}"), None).await;
  assert_eq!(scored["status"], "scored");
  assert_eq!(scored["user_answer"], "It was everywhere.");
}

#[tokio::test]
async fn generation_failure_is_a_bad_gateway() {
  let app = app().await;
  let id = add_word(&app, "unspeakable").await;

  let (status, _) = send(
    &app,
    "POST",
    &format!("/words/{id}/exercises"),
    Some(json!({ "direction": "toward_target" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_GATEWAY);

  let (_, list) = send(&app, "GET", &format!("/words/{id}/exercises"), None).await;
  assert!(list.as_array().unwrap().is_empty());
}

// ── Translate ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn translate_uses_configured_languages_by_default() {
  let app = app().await;

  let (status, body) = send(&app, "POST", "/translate", Some(json!({ "text": "hello" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["translation"], "hello (en->tr)");

  let (_, body) = send(
    &app,
    "POST",
    "/translate",
    Some(json!({ "text": "merhaba", "source_lang": "tr", "target_lang": "en" })),
  )
  .await;
  assert_eq!(body["translation"], "merhaba (tr->en)");
}
