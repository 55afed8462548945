//! HTTP client for the Gemini generateContent endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Schema,
};

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Error, Debug)]
pub enum GenAiError {
    /// Credential absent; detected before any network call.
    #[error("GEMINI_API_KEY environment variable not set. The app cannot function without it.")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("response contained no usable content")]
    EmptyResponse,
}

/// The remote generation boundary: structured-JSON-in, text or image out.
/// Abstracted so the content generator can be tested against a fake.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run a text prompt; when a schema is declared the response is
    /// constrained to structured JSON matching it.
    async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        schema: Option<Schema>,
    ) -> Result<String, GenAiError>;

    /// Run an image prompt; returns the base64 payload of the image.
    async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, GenAiError>;
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from `GEMINI_API_KEY`. Fails fast when the key is
    /// missing so callers never reach the network unconfigured.
    pub fn from_env() -> Result<Self, GenAiError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(GenAiError::MissingApiKey)?;
        Self::new(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn new(api_key: String, base_url: String) -> Result<Self, GenAiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenAiError::Api { status: status.as_u16(), message });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        schema: Option<Schema>,
    ) -> Result<String, GenAiError> {
        let generation_config = schema.map(|schema| GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        });

        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config,
        };

        let response = self.generate(model, &request).await?;
        response.text().ok_or(GenAiError::EmptyResponse)
    }

    async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, GenAiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: None,
        };

        let response = self.generate(model, &request).await?;
        response.inline_image_data().ok_or(GenAiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new("test-key".to_string(), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn generate_text_sends_schema_and_returns_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "[{\"term\": \"NPO\"}]"}], "role": "model"}
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let text = client
            .generate_text("gemini-2.5-flash", "make cards", Some(Schema::array(Schema::string())))
            .await
            .unwrap();
        assert_eq!(text, "[{\"term\": \"NPO\"}]");
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate_text("gemini-2.5-pro", "prompt", None).await.unwrap_err();
        match err {
            GenAiError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_image_extracts_inline_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash-image:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{"inlineData": {"data": "aW1hZ2U=", "mimeType": "image/png"}}],
                        "role": "model"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let data = client
            .generate_image("gemini-2.5-flash-image", "an EKG strip")
            .await
            .unwrap();
        assert_eq!(data, "aW1hZ2U=");
    }

    #[tokio::test]
    async fn text_response_without_candidates_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate_text("gemini-2.5-flash", "prompt", None).await.unwrap_err();
        assert!(matches!(err, GenAiError::EmptyResponse));
    }
}
