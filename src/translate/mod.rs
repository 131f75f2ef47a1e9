//! Translation enrichment
//!
//! Looks up a translated description for a record before it is persisted.
//! Failures here are always recovered by the caller: a record whose
//! translation fails is stored with an empty translated description.

use crate::config::TranslationConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the translation lookup
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Translation API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Translation request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed translation response")]
    Malformed,
}

/// Source of translated text for record enrichment
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// DeepL-style translation API client
pub struct DeepLTranslator {
    client: Client,
    api_url: String,
    api_key: String,
    target_lang: String,
}

impl DeepLTranslator {
    /// Builds a translator from configuration
    ///
    /// Returns `Ok(None)` when no API key is configured; enrichment is
    /// then skipped entirely for the run.
    pub fn new(config: &TranslationConfig) -> Result<Option<Self>, reqwest::Error> {
        if config.api_key.is_empty() {
            tracing::info!("No translation API key configured, enrichment disabled");
            return Ok(None);
        }

        let client = Client::builder().build()?;
        Ok(Some(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            target_lang: config.target_lang.clone(),
        }))
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let response = self
            .client
            .post(&self.api_url)
            .form(&[
                ("auth_key", self.api_key.as_str()),
                ("text", text),
                ("target_lang", self.target_lang.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: TranslateResponse =
            serde_json::from_str(&body).map_err(|_| TranslationError::Malformed)?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or(TranslationError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: String, api_key: &str) -> TranslationConfig {
        TranslationConfig {
            api_url,
            api_key: api_key.to_string(),
            target_lang: "KO".to_string(),
        }
    }

    #[test]
    fn test_empty_api_key_disables_enrichment() {
        let translator =
            DeepLTranslator::new(&config("https://translate.example.com".to_string(), ""))
                .unwrap();
        assert!(translator.is_none());
    }

    #[tokio::test]
    async fn test_translate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/translate"))
            .and(body_string_contains("target_lang=KO"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"translations":[{"text":"번역된 설명"}]}"#,
            ))
            .mount(&server)
            .await;

        let translator =
            DeepLTranslator::new(&config(format!("{}/v2/translate", server.uri()), "key"))
                .unwrap()
                .expect("translator should be enabled");

        let result = translator.translate("a description").await.unwrap();
        assert_eq!(result, "번역된 설명");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/translate"))
            .respond_with(ResponseTemplate::new(403).set_body_string("invalid auth key"))
            .mount(&server)
            .await;

        let translator =
            DeepLTranslator::new(&config(format!("{}/v2/translate", server.uri()), "bad"))
                .unwrap()
                .expect("translator should be enabled");

        let err = translator.translate("text").await.unwrap_err();
        match err {
            TranslationError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "invalid auth key");
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"translations":[]}"#))
            .mount(&server)
            .await;

        let translator =
            DeepLTranslator::new(&config(format!("{}/v2/translate", server.uri()), "key"))
                .unwrap()
                .expect("translator should be enabled");

        assert!(matches!(
            translator.translate("text").await.unwrap_err(),
            TranslationError::Malformed
        ));
    }
}
