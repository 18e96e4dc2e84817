//! Abstractions over the external text-generation capability.
//!
//! The summarizer treats text generation as an opaque dependency: one call in, one
//! trimmed completion out. Adapters exist for OpenAI-compatible chat completion APIs
//! and for a local Ollama runtime; both issue HTTP requests directly and carry a
//! per-call timeout so a hung provider cannot hang the whole request.

use crate::config::{Config, GenerationProvider};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

mod ollama;
mod openai;

pub use ollama::OllamaGenerationClient;
pub use openai::OpenAiGenerationClient;

/// Per-call timeout applied when the configuration does not override it.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;

/// Errors surfaced while requesting text generation.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// Provider endpoint was unreachable or not configured.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate text: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Single generation round-trip assembled by the summarization pipeline.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Instruction framing the assistant's role.
    pub system_prompt: String,
    /// Prompt carrying the document text or partial summaries.
    pub user_prompt: String,
    /// Optional sampling temperature; providers use their default when absent.
    pub temperature: Option<f32>,
}

/// Interface implemented by text-generation providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Produce a completion for the supplied request, trimmed of surrounding whitespace.
    async fn generate(&self, request: GenerationRequest)
    -> Result<String, GenerationClientError>;
}

/// Build a generation client for the configured provider.
pub fn build_generation_client(
    config: &Config,
) -> Result<Box<dyn GenerationClient + Send + Sync>, GenerationClientError> {
    let timeout = Duration::from_secs(
        config
            .generation_timeout_secs
            .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS),
    );
    match config.generation_provider {
        GenerationProvider::OpenAI => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                GenerationClientError::ProviderUnavailable(
                    "OPENAI_API_KEY is not set for the OpenAI provider".to_string(),
                )
            })?;
            Ok(Box::new(OpenAiGenerationClient::new(
                config.openai_base_url.clone(),
                api_key,
                timeout,
            )))
        }
        GenerationProvider::Ollama => Ok(Box::new(OllamaGenerationClient::new(
            config.ollama_url.clone(),
            timeout,
        ))),
    }
}
