use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Model requested from the generation provider when none is configured.
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-3.5-turbo";

/// Summary language applied when neither the request nor the environment names one.
pub const DEFAULT_LANGUAGE: &str = "ko";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarization pipeline.
///
/// Loaded once at process start and passed explicitly into the components
/// that need it; there is no process-global configuration cache.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Text-generation backend used to produce summaries.
    pub generation_provider: GenerationProvider,
    /// Model identifier passed to the generation provider.
    pub generation_model: String,
    /// API key presented to OpenAI-compatible providers.
    pub openai_api_key: Option<String>,
    /// Optional base URL override for OpenAI-compatible providers.
    pub openai_base_url: Option<String>,
    /// Optional base URL of the local Ollama runtime.
    pub ollama_url: Option<String>,
    /// Optional override for the direct-summarization token threshold.
    pub direct_token_limit: Option<usize>,
    /// Optional override for the per-chunk token budget.
    pub chunk_token_limit: Option<usize>,
    /// Optional per-call timeout applied to generation requests, in seconds.
    pub generation_timeout_secs: Option<u64>,
    /// Language code used when a request does not specify one.
    pub default_language: String,
}

/// Supported text-generation backends.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    /// Hosted OpenAI-compatible chat completions API.
    OpenAI,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            generation_provider: load_env_optional("GENERATION_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("GENERATION_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(GenerationProvider::OpenAI),
            generation_model: load_env_optional("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            openai_api_key: load_env_optional("OPENAI_API_KEY"),
            openai_base_url: load_env_optional("OPENAI_BASE_URL"),
            ollama_url: load_env_optional("OLLAMA_URL"),
            direct_token_limit: parse_env_optional("SUMMARY_DIRECT_TOKEN_LIMIT")?,
            chunk_token_limit: parse_env_optional("SUMMARY_CHUNK_TOKEN_LIMIT")?,
            generation_timeout_secs: parse_env_optional("GENERATION_TIMEOUT_SECS")?,
            default_language: load_env_optional("SUMMARY_DEFAULT_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        };

        if matches!(config.generation_provider, GenerationProvider::OpenAI)
            && config.openai_api_key.is_none()
        {
            return Err(ConfigError::MissingVariable("OPENAI_API_KEY".to_string()));
        }

        Ok(config)
    }

    /// Load a `.env` file when present, then read configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        tracing::debug!(
            provider = ?config.generation_provider,
            model = %config.generation_model,
            direct_token_limit = ?config.direct_token_limit,
            chunk_token_limit = ?config.chunk_token_limit,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for GenerationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}
