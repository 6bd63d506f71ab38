//! OpenAI-compatible chat-completion client.
//!
//! Every call goes through [`CompletionClient::complete`], which walks the
//! configured models in order, retrying transient failures with linear
//! backoff before moving on to the fallback.

use std::{future::Future, sync::Arc};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{CompletionConfig, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub role:    Role,
  pub content: String,
}

impl Message {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

/// Sampling parameters for a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
  pub max_tokens:  u32,
  pub temperature: f32,
}

/// Something that turns a conversation into one trimmed, non-empty reply.
pub trait Completion: Send + Sync {
  fn complete<'a>(
    &'a self,
    messages: &'a [Message],
    params: CompletionParams,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    &'a [Message],
  max_tokens:  u32,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  reasoning:   Option<Reasoning>,
}

/// Asks reasoning models to spend less of the token budget thinking.
#[derive(Debug, Serialize)]
struct Reasoning {
  effort: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  message: String,
}

fn is_reasoning_model(model: &str) -> bool {
  let model = model.to_lowercase();
  model.contains("r1") || model.contains("reason")
}

/// The production [`Completion`] implementation.
#[derive(Clone)]
pub struct CompletionClient {
  client: Client,
  config: Arc<CompletionConfig>,
}

impl CompletionClient {
  pub fn new(config: CompletionConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config: Arc::new(config) })
  }

  pub fn config(&self) -> &CompletionConfig { &self.config }

  fn chat_completions_url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }

  /// One HTTP round trip. Returns the trimmed content, which may be empty.
  async fn request(
    &self,
    model: &str,
    messages: &[Message],
    params: CompletionParams,
  ) -> Result<String> {
    let body = ChatRequest {
      model,
      messages,
      max_tokens: params.max_tokens,
      temperature: params.temperature,
      reasoning: is_reasoning_model(model).then_some(Reasoning { effort: "low" }),
    };

    let response = self
      .client
      .post(self.chat_completions_url())
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
      return Err(Error::Api { status: status.as_u16(), message });
    }

    let chat: ChatResponse = response.json().await?;
    let content = chat
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .unwrap_or_default();

    Ok(content.trim().to_owned())
  }

  async fn complete_with_fallback(
    &self,
    messages: &[Message],
    params: CompletionParams,
  ) -> Result<String> {
    let models = self.config.models();
    let mut attempts = 0;
    let mut last = None;

    for (index, model) in models.iter().enumerate() {
      let has_fallback = index + 1 < models.len();

      for attempt in 0..=self.config.max_retries {
        attempts += 1;

        let err = match self.request(model, messages, params).await {
          Ok(content) if !content.is_empty() => {
            debug!(model, attempts, "completion succeeded");
            return Ok(content);
          }
          Ok(_) => Error::EmptyContent { model: (*model).to_owned() },
          Err(e) => e,
        };

        if matches!(err, Error::EmptyContent { .. }) && has_fallback {
          warn!(model, "model returned no content, switching to fallback");
          last = Some(err);
          break;
        }

        if !err.is_transient() {
          warn!(model, error = %err, "completion failed with a non-retryable error");
          return Err(err);
        }

        warn!(model, attempt, error = %err, "completion attempt failed");
        last = Some(err);

        if attempt < self.config.max_retries {
          tokio::time::sleep(self.config.backoff * (attempt + 1)).await;
        }
      }
    }

    let last = last.unwrap_or_else(|| Error::EmptyContent { model: self.config.model.clone() });
    Err(Error::Exhausted { attempts, last: Box::new(last) })
  }
}

impl Completion for CompletionClient {
  fn complete<'a>(
    &'a self,
    messages: &'a [Message],
    params: CompletionParams,
  ) -> impl Future<Output = Result<String>> + Send + 'a {
    self.complete_with_fallback(messages, params)
  }
}
