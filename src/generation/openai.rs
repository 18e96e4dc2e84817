use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{GenerationClient, GenerationClientError, GenerationRequest};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Generation client speaking the OpenAI chat completions protocol.
///
/// The base URL can be overridden to target self-hosted OpenAI-compatible gateways.
pub struct OpenAiGenerationClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiGenerationClient {
    /// Construct a client for the given endpoint, credentials, and per-call timeout.
    pub fn new(base_url: Option<String>, api_key: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("docbrief/generation")
            .timeout(timeout)
            .build()
            .expect("Failed to construct reqwest::Client for generation");
        Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl GenerationClient for OpenAiGenerationClient {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<String, GenerationClientError> {
        let mut payload = json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
        });
        if let Some(temperature) = request.temperature {
            payload["temperature"] = json!(temperature);
        }

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationClientError::ProviderUnavailable(format!(
                "endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!(
                "failed to decode chat completion response: {error}"
            ))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GenerationClientError::InvalidResponse(
                    "chat completion response contained no message content".into(),
                )
            })?;

        Ok(content.trim().to_string())
    }
}
