//! Google Gemini transport implementation

use super::{Transport, TransportError};
use crate::codec::{WireContent, WireRequest};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Optional sampling settings forwarded as `generationConfig`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationSettings {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerationSettings {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

/// Gemini `generateContent` client
pub struct GeminiTransport {
    client: Client,
    api_key: String,
    endpoint: String,
    model_id: String,
    generation: GenerationSettings,
}

impl GeminiTransport {
    /// # Errors
    ///
    /// Fails with a network error when the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        model: &str,
        api_base: &str,
        timeout: Duration,
        generation: GenerationSettings,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint_url(api_base, model),
            model_id: model.to_string(),
            generation,
        })
    }

    /// # Errors
    ///
    /// See [`GeminiTransport::new`].
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(
            config.api_key.clone(),
            &config.model,
            &config.api_base,
            config.timeout,
            config.generation,
        )
    }

    fn translate_request<'a>(&self, request: &'a WireRequest) -> GeminiRequest<'a> {
        let generation_config = if self.generation.is_empty() {
            None
        } else {
            Some(GeminiGenerationConfig {
                temperature: self.generation.temperature,
                max_output_tokens: self.generation.max_output_tokens,
            })
        };

        GeminiRequest {
            contents: &request.contents,
            generation_config,
        }
    }

    /// Text of the first candidate, joined across its text parts
    fn extract_text(resp: GeminiResponse) -> Result<String, TransportError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(TransportError::no_candidates)?;

        if let Some(reason) = &candidate.finish_reason {
            tracing::debug!(finish_reason = %reason, "Gemini candidate finished");
        }

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(TransportError::no_candidates());
        }
        Ok(text)
    }

    fn status_error(status: reqwest::StatusCode, body: &str) -> TransportError {
        let message = match serde_json::from_str::<GeminiErrorResponse>(body) {
            Ok(error_resp) => format!("HTTP {status}: {}", error_resp.error.message),
            Err(_) => format!("HTTP {status} error: {body}"),
        };
        TransportError::status(status.as_u16(), message)
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn send(&self, request: &WireRequest) -> Result<String, TransportError> {
        let gemini_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                // Request URLs never go into messages, which end up in logs
                let e = e.without_url();
                if e.is_timeout() {
                    TransportError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    TransportError::network(format!("Connection failed: {e}"))
                } else {
                    TransportError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                TransportError::network(format!("Failed to read response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| TransportError::network(format!("Failed to parse response: {e}")))?;

        Self::extract_text(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn endpoint_url(api_base: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        model
    )
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: &'a [WireContent],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
