use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{GenerationClient, GenerationClientError, GenerationRequest};

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Generation client backed by a local Ollama runtime.
pub struct OllamaGenerationClient {
    http: Client,
    base_url: String,
}

impl OllamaGenerationClient {
    /// Construct a client for the given runtime URL and per-call timeout.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("docbrief/generation")
            .timeout(timeout)
            .build()
            .expect("Failed to construct reqwest::Client for generation");
        Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl GenerationClient for OllamaGenerationClient {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<String, GenerationClientError> {
        let mut payload = json!({
            "model": request.model,
            "system": request.system_prompt,
            "prompt": request.user_prompt,
            "stream": false,
        });
        if let Some(temperature) = request.temperature {
            payload["options"] = json!({ "temperature": temperature });
        }

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(GenerationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}
