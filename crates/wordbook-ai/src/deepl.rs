//! DeepL-backed [`Translator`].

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use wordbook_core::translate::Translator;

use crate::Result;

pub const DEEPL_PRO_URL: &str = "https://api.deepl.com";
pub const DEEPL_FREE_URL: &str = "https://api-free.deepl.com";

/// Start of every text returned in place of a translation on failure.
pub const FAILURE_PREFIX: &str = "Translation failed:";

const TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
  text:        [&'a str; 1],
  source_lang: String,
  target_lang: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
  translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
  text: String,
}

#[derive(Debug, Deserialize)]
struct DeepLError {
  message: String,
}

/// Calls the DeepL v2 API once per request, with no retry.
#[derive(Clone)]
pub struct DeepLTranslator {
  client:   Client,
  api_key:  String,
  base_url: String,
}

impl DeepLTranslator {
  /// `base_url` overrides the endpoint; otherwise free-tier keys (ending in
  /// `:fx`) use the free API host.
  pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Result<Self> {
    let api_key = api_key.into();
    let base_url = base_url.unwrap_or_else(|| {
      if api_key.ends_with(":fx") { DEEPL_FREE_URL } else { DEEPL_PRO_URL }.to_owned()
    });
    let client = Client::builder().timeout(TIMEOUT).build()?;

    Ok(Self { client, api_key, base_url })
  }

  pub fn base_url(&self) -> &str { &self.base_url }

  async fn request(&self, source_lang: &str, target_lang: &str, text: &str) -> Result<String, String> {
    let body = TranslateRequest {
      text:        [text],
      source_lang: source_lang.to_uppercase(),
      target_lang: target_lang.to_uppercase(),
    };

    let response = self
      .client
      .post(format!("{}/v2/translate", self.base_url.trim_end_matches('/')))
      .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
      .json(&body)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    let status = response.status();
    match status {
      StatusCode::FORBIDDEN => return Err("DeepL authorization failed (check the API key).".into()),
      s if s.as_u16() == 456 => return Err("DeepL quota exceeded.".into()),
      s if !s.is_success() => {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<DeepLError>(&body)
          .map(|e| e.message)
          .unwrap_or(body);
        return Err(format!("DeepL returned {status}: {message}"));
      }
      _ => {}
    }

    let parsed: TranslateResponse = response.json().await.map_err(|e| e.to_string())?;
    parsed
      .translations
      .into_iter()
      .next()
      .map(|t| t.text)
      .ok_or_else(|| "DeepL returned no translation.".to_owned())
  }
}

impl Translator for DeepLTranslator {
  fn translate<'a>(
    &'a self,
    source_lang: &'a str,
    target_lang: &'a str,
    text: &'a str,
  ) -> impl Future<Output = String> + Send + 'a {
    async move {
      let text = text.trim();
      if text.is_empty() {
        return String::new();
      }

      match self.request(source_lang, target_lang, text).await {
        Ok(translated) => translated,
        Err(reason) => {
          warn!(%reason, "translation failed");
          format!("{FAILURE_PREFIX} {reason}")
        }
      }
    }
  }
}
