use std::{
  collections::VecDeque,
  future::Future,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use serde_json::json;
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{body_partial_json, header, method, path},
};
use wordbook_core::{direction::Direction, grader::Grader, translate::Translator};

use crate::*;

// ─── Helpers ────────────────────────────────────────────────────────────────

fn config(server: &MockServer) -> CompletionConfig {
  CompletionConfig {
    base_url: server.uri(),
    model: "primary/chat".into(),
    fallback_model: Some("fallback/r1".into()),
    timeout: Duration::from_secs(5),
    max_retries: 1,
    backoff: Duration::from_millis(1),
    ..CompletionConfig::new("test-key")
  }
}

fn reply(content: &str) -> ResponseTemplate {
  ResponseTemplate::new(200).set_body_json(json!({
    "choices": [{ "message": { "role": "assistant", "content": content } }]
  }))
}

/// Replays canned replies and counts calls.
struct Scripted {
  replies: Mutex<VecDeque<Result<String>>>,
  calls:   AtomicUsize,
}

impl Scripted {
  fn new(replies: impl IntoIterator<Item = Result<String>>) -> Self {
    Self { replies: Mutex::new(replies.into_iter().collect()), calls: AtomicUsize::new(0) }
  }

  fn ok(reply: &str) -> Self { Self::new([Ok(reply.to_owned())]) }
}

impl Completion for Scripted {
  fn complete<'a>(
    &'a self,
    _messages: &'a [Message],
    _params: CompletionParams,
  ) -> impl Future<Output = Result<String>> + Send + 'a {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let next = self
      .replies
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Err(Error::EmptyContent { model: "scripted".into() }));
    async move { next }
  }
}

// ─── Completion client ──────────────────────────────────────────────────────

#[tokio::test]
async fn completion_sends_bearer_auth_and_trims_content() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/chat/completions"))
    .and(header("authorization", "Bearer test-key"))
    .and(body_partial_json(json!({ "model": "primary/chat", "max_tokens": 128 })))
    .respond_with(reply("  Merhaba dünya.  \n"))
    .expect(1)
    .mount(&server)
    .await;

  let client = CompletionClient::new(config(&server)).unwrap();
  let out = client.complete(&[Message::user("hi")], prompts::SENTENCE_PARAMS).await.unwrap();
  assert_eq!(out, "Merhaba dünya.");
}

#[tokio::test]
async fn rate_limit_is_retried() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(429))
    .up_to_n_times(1)
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("POST")).respond_with(reply("ok")).expect(1).mount(&server).await;

  let client = CompletionClient::new(config(&server)).unwrap();
  let out = client.complete(&[Message::user("hi")], prompts::GRADE_PARAMS).await.unwrap();
  assert_eq!(out, "ok");
}

#[tokio::test]
async fn empty_primary_content_switches_to_fallback_with_low_reasoning() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(body_partial_json(json!({ "model": "primary/chat" })))
    .respond_with(reply("   "))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("POST"))
    .and(body_partial_json(json!({ "model": "fallback/r1", "reasoning": { "effort": "low" } })))
    .respond_with(reply("from fallback"))
    .expect(1)
    .mount(&server)
    .await;

  let client = CompletionClient::new(config(&server)).unwrap();
  let out = client.complete(&[Message::user("hi")], prompts::SENTENCE_PARAMS).await.unwrap();
  assert_eq!(out, "from fallback");
}

#[tokio::test]
async fn server_errors_exhaust_both_models() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
    .expect(4)
    .mount(&server)
    .await;

  let client = CompletionClient::new(config(&server)).unwrap();
  let err = client.complete(&[Message::user("hi")], prompts::SENTENCE_PARAMS).await.unwrap_err();

  match err {
    Error::Exhausted { attempts, last } => {
      assert_eq!(attempts, 4);
      assert!(matches!(*last, Error::Api { status: 503, .. }));
    }
    other => panic!("expected Exhausted, got {other:?}"),
  }
}

#[tokio::test]
async fn timeout_is_retried() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(reply("slow").set_delay(Duration::from_secs(3)))
    .up_to_n_times(1)
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("POST")).respond_with(reply("fast")).expect(1).mount(&server).await;

  let client = CompletionClient::new(CompletionConfig {
    timeout: Duration::from_millis(300),
    ..config(&server)
  })
  .unwrap();
  let out = client.complete(&[Message::user("hi")], prompts::GRADE_PARAMS).await.unwrap();
  assert_eq!(out, "fast");
}

#[tokio::test]
async fn garbled_success_body_is_retried() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
    .up_to_n_times(1)
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("POST")).respond_with(reply("ok")).expect(1).mount(&server).await;

  let client = CompletionClient::new(config(&server)).unwrap();
  let out = client.complete(&[Message::user("hi")], prompts::GRADE_PARAMS).await.unwrap();
  assert_eq!(out, "ok");
}

#[tokio::test]
async fn refused_connections_exhaust_both_models() {
  // Reserve a port, then free it so nothing is listening there.
  let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
  let config = CompletionConfig {
    base_url: format!("http://127.0.0.1:{port}"),
    model: "primary/chat".into(),
    fallback_model: Some("fallback/r1".into()),
    timeout: Duration::from_secs(5),
    max_retries: 1,
    backoff: Duration::from_millis(1),
    ..CompletionConfig::new("test-key")
  };

  let client = CompletionClient::new(config).unwrap();
  let err = client.complete(&[Message::user("hi")], prompts::SENTENCE_PARAMS).await.unwrap_err();

  match err {
    Error::Exhausted { attempts, last } => {
      assert_eq!(attempts, 2 * (1 + 1));
      assert!(matches!(*last, Error::Http(ref e) if e.is_connect()));
    }
    other => panic!("expected Exhausted, got {other:?}"),
  }
}

#[tokio::test]
async fn client_errors_are_not_retried() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(
      ResponseTemplate::new(401).set_body_json(json!({ "error": { "message": "bad key" } })),
    )
    .expect(1)
    .mount(&server)
    .await;

  let client = CompletionClient::new(config(&server)).unwrap();
  let err = client.complete(&[Message::user("hi")], prompts::SENTENCE_PARAMS).await.unwrap_err();
  assert!(matches!(err, Error::Api { status: 401, ref message } if message == "bad key"));
}

// ─── AiGrader ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn grader_combines_feedback_and_suggestion() {
  let grader = AiGrader::new(
    Scripted::ok(r#"{"score": 8, "feedback": "Doğru ama biraz resmi.", "better": "It is everywhere."}"#),
    Languages::default(),
  );

  let grade = grader
    .score_translation(Direction::TowardTarget, "Her yerde.", "It is in every place.")
    .await
    .unwrap();

  assert_eq!(grade.score.get(), 8);
  assert_eq!(grade.feedback, "Doğru ama biraz resmi.\nBetter phrasing (EN): It is everywhere.");
}

#[tokio::test]
async fn grader_suggestion_label_is_configurable() {
  let grader = AiGrader::new(Scripted::ok(r#"{"score": 4, "better": "Her yerde."}"#), Languages::default())
    .with_suggestion_label("Daha akıcı öneri");

  let grade = grader
    .score_translation(Direction::TowardSource, "It is everywhere.", "O her yer.")
    .await
    .unwrap();

  assert_eq!(grade.feedback, "Daha akıcı öneri (TR): Her yerde.");
}

#[tokio::test]
async fn grader_accepts_pattern_scores_and_clamps() {
  let grader = AiGrader::new(Scripted::ok("Solid attempt, 12/10 really."), Languages::default());
  let grade = grader.score_translation(Direction::TowardTarget, "a", "b").await.unwrap();
  assert_eq!(grade.score.get(), 10);
  assert_eq!(grade.feedback, "");
}

#[tokio::test]
async fn grader_rejects_unparseable_replies() {
  let grader = AiGrader::new(Scripted::ok("I'd rather not say."), Languages::default());
  let err = grader.score_translation(Direction::TowardTarget, "a", "b").await.unwrap_err();
  assert!(matches!(err, Error::Unparseable { .. }));
  assert_eq!(grader.completion().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn generated_sentence_is_unquoted_and_must_be_non_empty() {
  let grader = AiGrader::new(
    Scripted::new([Ok("\"Akıllı telefonlar artık her yerde.\"".to_owned()), Ok("\"\"".to_owned())]),
    Languages::default(),
  );

  let sentence = grader.generate_sentence(Direction::TowardTarget, "ubiquitous", "yaygın").await;
  assert_eq!(sentence.unwrap(), "Akıllı telefonlar artık her yerde.");

  let empty = grader.generate_sentence(Direction::TowardTarget, "ubiquitous", "yaygın").await;
  assert!(matches!(empty, Err(Error::EmptySentence)));
}

#[tokio::test]
async fn completion_errors_pass_through_the_grader() {
  let scripted = Scripted::new([Err(Error::Api { status: 400, message: "nope".into() })]);
  let grader = AiGrader::new(scripted, Languages::default());

  let err = grader.generate_sentence(Direction::TowardSource, "a", "b").await.unwrap_err();
  assert!(matches!(err, Error::Api { status: 400, .. }));
}

// ─── DeepL ──────────────────────────────────────────────────────────────────

#[test]
fn free_keys_use_the_free_host() {
  assert_eq!(DeepLTranslator::new("abc:fx", None).unwrap().base_url(), deepl::DEEPL_FREE_URL);
  assert_eq!(DeepLTranslator::new("abc", None).unwrap().base_url(), deepl::DEEPL_PRO_URL);
}

#[tokio::test]
async fn deepl_translates() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/v2/translate"))
    .and(header("authorization", "DeepL-Auth-Key secret"))
    .and(body_partial_json(json!({ "text": ["ubiquitous"], "source_lang": "EN", "target_lang": "TR" })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "translations": [{ "detected_source_language": "EN", "text": "yaygın" }]
    })))
    .expect(1)
    .mount(&server)
    .await;

  let deepl = DeepLTranslator::new("secret", Some(server.uri())).unwrap();
  assert_eq!(deepl.translate("en", "tr", "  ubiquitous ").await, "yaygın");
}

#[tokio::test]
async fn deepl_failures_become_text() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(456))
    .expect(1)
    .mount(&server)
    .await;

  let deepl = DeepLTranslator::new("secret", Some(server.uri())).unwrap();
  assert_eq!(deepl.translate("en", "tr", "word").await, "Translation failed: DeepL quota exceeded.");
}

#[tokio::test]
async fn deepl_blank_input_skips_the_request() {
  let server = MockServer::start().await;
  Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

  let deepl = DeepLTranslator::new("secret", Some(server.uri())).unwrap();
  assert_eq!(deepl.translate("en", "tr", "   ").await, "");
}
