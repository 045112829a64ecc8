//! REST client for the Gemini (text) and Imagen (image) endpoints.
//!
//! Both calls are single POSTs authenticated with an API key in the query
//! string. Response bodies are decoded as loose JSON and the one field we
//! need is picked out by [`extract_text`] / [`extract_image`].

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::GenerationError;
use crate::ContentGenerator;

/// Public Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// API root without trailing slash.
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

/// HTTP client for the hosted generative service.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.config.base_url)
    }

    async fn post(&self, url: String, body: &Value) -> Result<Value, GenerationError> {
        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, or an
    /// [`GenerationError::ApiError`] carrying status and body otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response(response: reqwest::Response) -> Result<Value, GenerationError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = text_request(prompt);
        let url = self.model_url(&self.config.text_model, "generateContent");
        let result = self.post(url, &body).await.inspect_err(|e| {
            tracing::warn!(model = %self.config.text_model, error = %e, "Text generation failed");
        })?;
        extract_text(&result)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        sample_count: u32,
    ) -> Result<String, GenerationError> {
        let body = image_request(prompt, sample_count);
        let url = self.model_url(&self.config.image_model, "predict");
        let result = self.post(url, &body).await.inspect_err(|e| {
            tracing::warn!(model = %self.config.image_model, error = %e, "Image generation failed");
        })?;
        extract_image(&result)
    }
}

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

fn text_request(prompt: &str) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
    })
}

fn image_request(prompt: &str, sample_count: u32) -> Value {
    json!({
        "instances": { "prompt": prompt },
        "parameters": { "sampleCount": sample_count },
    })
}

/// Pull `candidates[0].content.parts[0].text` out of a text response.
///
/// Blank text counts as missing.
pub fn extract_text(result: &Value) -> Result<String, GenerationError> {
    result
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(GenerationError::UnexpectedShape(
            "candidates[0].content.parts[0].text",
        ))
}

/// Pull `predictions[0].bytesBase64Encoded` out of an image response.
pub fn extract_image(result: &Value) -> Result<String, GenerationError> {
    result
        .pointer("/predictions/0/bytesBase64Encoded")
        .and_then(Value::as_str)
        .filter(|b64| !b64.is_empty())
        .map(str::to_string)
        .ok_or(GenerationError::UnexpectedShape(
            "predictions[0].bytesBase64Encoded",
        ))
}
