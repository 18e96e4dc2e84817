//! Chunked summarization pipeline.
//!
//! This module decides how a document gets summarized:
//!
//! - Token-accurate path selection: the document is tokenized with the BPE encoding of
//!   the configured generation model, and the token count (never the character count)
//!   decides between the direct and chunked paths.
//! - Direct path: documents at or below the direct threshold are summarized with a
//!   single low-temperature generation call that honors the caller's custom prompt.
//! - Chunked path: longer documents are cut into consecutive token slices of at most
//!   the chunk budget; each slice is summarized independently and a final call
//!   synthesizes one coherent summary from the partial summaries in document order.
//!   The caller's custom prompt applies to the synthesis call only, so per-chunk
//!   prompts stay uniform.
//!
//! Chunk calls are issued concurrently and joined back in chunk order. The first
//! failure aborts the request; partial summaries are never returned or persisted.

use crate::config::Config;
use crate::generation::{GenerationClient, GenerationClientError, GenerationRequest};
use anyhow::Error as TokenizerError;
use futures_util::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use tiktoken_rs::CoreBPE;

mod chunking;
mod prompts;

/// Token threshold at or below which a document is summarized in a single call.
pub const DEFAULT_DIRECT_TOKEN_LIMIT: usize = 4000;

/// Maximum tokens per chunk when a document exceeds the direct threshold.
pub const DEFAULT_CHUNK_TOKEN_LIMIT: usize = 3000;

const DIRECT_TEMPERATURE: f32 = 0.5;

/// Errors produced by the summarization pipeline.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Input text was empty or whitespace-only; no generation call was made.
    #[error("document contains no usable text")]
    EmptyContent,
    /// Configured token limits cannot drive the pipeline.
    #[error("token limits must be greater than zero")]
    InvalidTokenLimit,
    /// Tokenizer resources were unavailable for the configured model.
    #[error("failed to initialize tokenizer for model '{model}': {source}")]
    Tokenizer {
        /// Generation model whose encoding we attempted to load.
        model: String,
        /// Underlying error raised by the tokenizer library.
        #[source]
        source: TokenizerError,
    },
    /// A token chunk could not be decoded back to text.
    #[error("failed to decode tokens for model '{model}': {source}")]
    Decode {
        /// Generation model whose encoding produced the tokens.
        model: String,
        /// Underlying error raised by the tokenizer library.
        #[source]
        source: TokenizerError,
    },
    /// The generation provider failed or returned unusable output.
    #[error("Failed to generate summary: {0}")]
    Generation(#[from] GenerationClientError),
}

/// Token budgets steering path selection and chunk partitioning.
#[derive(Debug, Clone, Copy)]
pub struct SummarizerLimits {
    /// Token threshold at or below which the direct path is taken.
    pub direct_token_limit: usize,
    /// Maximum tokens per chunk on the chunked path.
    pub chunk_token_limit: usize,
}

impl Default for SummarizerLimits {
    fn default() -> Self {
        Self {
            direct_token_limit: DEFAULT_DIRECT_TOKEN_LIMIT,
            chunk_token_limit: DEFAULT_CHUNK_TOKEN_LIMIT,
        }
    }
}

impl SummarizerLimits {
    /// Derive limits from configuration, applying defaults where unset.
    pub fn from_config(config: &Config) -> Self {
        Self {
            direct_token_limit: config
                .direct_token_limit
                .unwrap_or(DEFAULT_DIRECT_TOKEN_LIMIT),
            chunk_token_limit: config
                .chunk_token_limit
                .unwrap_or(DEFAULT_CHUNK_TOKEN_LIMIT),
        }
    }
}

/// Per-request summarization parameters supplied by the caller.
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    /// Language code the summary should be written in; passed through verbatim.
    pub language: String,
    /// Optional free-text instruction layered onto the summarization prompt.
    pub custom_prompt: Option<String>,
}

/// Path taken for a completed summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStrategy {
    /// Whole document summarized in a single generation call.
    Direct,
    /// Document partitioned into chunks, then synthesized from partial summaries.
    Chunked,
}

/// Result of a completed summarization, with diagnostics for logging and metrics.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// Final summary text, trimmed of surrounding whitespace.
    pub summary_text: String,
    /// Path taken to produce the summary.
    pub strategy: SummaryStrategy,
    /// Token count of the input document under the model's encoding.
    pub token_count: usize,
    /// Number of chunks produced; zero on the direct path.
    pub chunk_count: usize,
    /// Total generation calls issued for this document.
    pub generation_calls: usize,
}

/// Stateless single-pass summarizer delegating to an external generation provider.
///
/// Construct once with the provider client and token budgets; each invocation is
/// independent and retains no state between requests.
pub struct Summarizer {
    client: Box<dyn GenerationClient + Send + Sync>,
    encoding: Arc<CoreBPE>,
    model: String,
    limits: SummarizerLimits,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.model)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Summarizer {
    /// Build a summarizer for the given provider client and model.
    ///
    /// Fails when a token budget is zero or the model's encoding cannot be loaded.
    pub fn new(
        client: Box<dyn GenerationClient + Send + Sync>,
        model: &str,
        limits: SummarizerLimits,
    ) -> Result<Self, SummarizeError> {
        if limits.direct_token_limit == 0 || limits.chunk_token_limit == 0 {
            return Err(SummarizeError::InvalidTokenLimit);
        }
        let encoding = chunking::encoding_for_model(model)?;
        Ok(Self {
            client,
            encoding,
            model: model.to_string(),
            limits,
        })
    }

    /// Summarize a document, choosing the direct or chunked path by token count.
    ///
    /// Empty or whitespace-only input is rejected before any external call. Either a
    /// complete final summary is returned or an error; never both.
    pub async fn summarize(
        &self,
        text: &str,
        options: &SummarizeOptions,
    ) -> Result<SummaryOutcome, SummarizeError> {
        if text.trim().is_empty() {
            return Err(SummarizeError::EmptyContent);
        }

        let token_count = chunking::count_tokens(&self.encoding, text);
        if token_count <= self.limits.direct_token_limit {
            tracing::debug!(
                token_count,
                limit = self.limits.direct_token_limit,
                "Document fits the direct threshold; summarizing in one call"
            );
            return self.summarize_direct(text, token_count, options).await;
        }

        self.summarize_chunked(text, token_count, options).await
    }

    async fn summarize_direct(
        &self,
        text: &str,
        token_count: usize,
        options: &SummarizeOptions,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let request = GenerationRequest {
            model: self.model.clone(),
            system_prompt: prompts::DIRECT_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::direct_prompt(
                &options.language,
                options.custom_prompt.as_deref(),
                text,
            ),
            temperature: Some(DIRECT_TEMPERATURE),
        };
        let summary_text = self.client.generate(request).await?;
        Ok(SummaryOutcome {
            summary_text,
            strategy: SummaryStrategy::Direct,
            token_count,
            chunk_count: 0,
            generation_calls: 1,
        })
    }

    async fn summarize_chunked(
        &self,
        text: &str,
        token_count: usize,
        options: &SummarizeOptions,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let chunk_texts = chunking::chunk_document(
            &self.encoding,
            text,
            self.limits.chunk_token_limit,
            &self.model,
        )?;
        let chunk_count = chunk_texts.len();
        tracing::info!(
            token_count,
            chunk_count,
            chunk_token_limit = self.limits.chunk_token_limit,
            "Document exceeds the direct threshold; summarizing in chunks"
        );

        let partial_summaries = try_join_all(chunk_texts.iter().enumerate().map(
            |(index, chunk_text)| {
                let request = GenerationRequest {
                    model: self.model.clone(),
                    system_prompt: prompts::CHUNK_SYSTEM_PROMPT.to_string(),
                    user_prompt: prompts::chunk_prompt(&options.language, chunk_text),
                    temperature: None,
                };
                async move {
                    tracing::debug!(chunk = index + 1, total = chunk_count, "Summarizing chunk");
                    self.client.generate(request).await
                }
            },
        ))
        .await?;

        let combined_summaries = partial_summaries.join("\n\n");
        let request = GenerationRequest {
            model: self.model.clone(),
            system_prompt: prompts::SYNTHESIS_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::synthesis_prompt(
                &options.language,
                options.custom_prompt.as_deref(),
                &combined_summaries,
            ),
            temperature: None,
        };
        let summary_text = self.client.generate(request).await?;

        Ok(SummaryOutcome {
            summary_text,
            strategy: SummaryStrategy::Chunked,
            token_count,
            chunk_count,
            generation_calls: chunk_count + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const MODEL: &str = "gpt-3.5-turbo";

    #[derive(Default)]
    struct RecordingClient {
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl RecordingClient {
        fn recorded(&self) -> Vec<GenerationRequest> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    #[async_trait]
    impl GenerationClient for Arc<RecordingClient> {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<String, GenerationClientError> {
            let mut guard = self.requests.lock().expect("requests lock");
            guard.push(request);
            Ok(format!("summary-{}", guard.len()))
        }
    }

    struct FailingClient;

    #[async_trait]
    impl GenerationClient for FailingClient {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<String, GenerationClientError> {
            Err(GenerationClientError::GenerationFailed(
                "stub provider failure".into(),
            ))
        }
    }

    fn recording_summarizer(limits: SummarizerLimits) -> (Arc<RecordingClient>, Summarizer) {
        let client = Arc::new(RecordingClient::default());
        let summarizer =
            Summarizer::new(Box::new(Arc::clone(&client)), MODEL, limits).expect("summarizer");
        (client, summarizer)
    }

    fn options() -> SummarizeOptions {
        SummarizeOptions {
            language: "ko".into(),
            custom_prompt: None,
        }
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_any_generation_call() {
        let (client, summarizer) = recording_summarizer(SummarizerLimits::default());

        let error = summarizer.summarize("   \n\t", &options()).await.unwrap_err();

        assert!(matches!(error, SummarizeError::EmptyContent));
        assert!(client.recorded().is_empty());
    }

    #[tokio::test]
    async fn short_document_is_summarized_with_one_direct_call() {
        let (client, summarizer) = recording_summarizer(SummarizerLimits::default());
        let request_options = SummarizeOptions {
            language: "en".into(),
            custom_prompt: Some("Focus on dates.".into()),
        };

        let outcome = summarizer
            .summarize("A short note about the project timeline.", &request_options)
            .await
            .expect("summary");

        let calls = client.recorded();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt, prompts::DIRECT_SYSTEM_PROMPT);
        assert_eq!(calls[0].temperature, Some(DIRECT_TEMPERATURE));
        assert!(calls[0].user_prompt.contains("'en'"));
        assert!(calls[0].user_prompt.contains("Focus on dates."));
        assert!(calls[0]
            .user_prompt
            .ends_with("A short note about the project timeline."));

        assert_eq!(outcome.summary_text, "summary-1");
        assert_eq!(outcome.strategy, SummaryStrategy::Direct);
        assert_eq!(outcome.chunk_count, 0);
        assert_eq!(outcome.generation_calls, 1);
    }

    #[tokio::test]
    async fn long_document_is_chunked_and_synthesized_in_order() {
        let limits = SummarizerLimits {
            direct_token_limit: 8,
            chunk_token_limit: 3,
        };
        let (client, summarizer) = recording_summarizer(limits);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";

        let encoding = chunking::encoding_for_model(MODEL).expect("encoding");
        let token_count = chunking::count_tokens(&encoding, text);
        assert!(token_count > limits.direct_token_limit);
        let expected_chunks = token_count.div_ceil(limits.chunk_token_limit);
        let chunk_texts =
            chunking::chunk_document(&encoding, text, limits.chunk_token_limit, MODEL)
                .expect("chunks");

        let outcome = summarizer.summarize(text, &options()).await.expect("summary");

        let calls = client.recorded();
        assert_eq!(calls.len(), expected_chunks + 1);
        for (index, call) in calls[..expected_chunks].iter().enumerate() {
            assert_eq!(call.system_prompt, prompts::CHUNK_SYSTEM_PROMPT);
            assert_eq!(call.temperature, None);
            assert!(call.user_prompt.ends_with(&chunk_texts[index]));
        }

        let synthesis = &calls[expected_chunks];
        assert_eq!(synthesis.system_prompt, prompts::SYNTHESIS_SYSTEM_PROMPT);
        let expected_combined: Vec<String> = (1..=expected_chunks)
            .map(|n| format!("summary-{n}"))
            .collect();
        assert!(synthesis.user_prompt.ends_with(&expected_combined.join("\n\n")));

        assert_eq!(outcome.summary_text, format!("summary-{}", expected_chunks + 1));
        assert_eq!(outcome.strategy, SummaryStrategy::Chunked);
        assert_eq!(outcome.token_count, token_count);
        assert_eq!(outcome.chunk_count, expected_chunks);
        assert_eq!(outcome.generation_calls, expected_chunks + 1);
    }

    #[tokio::test]
    async fn custom_prompt_applies_to_synthesis_but_not_chunks() {
        let limits = SummarizerLimits {
            direct_token_limit: 8,
            chunk_token_limit: 3,
        };
        let (client, summarizer) = recording_summarizer(limits);
        let request_options = SummarizeOptions {
            language: "ko".into(),
            custom_prompt: Some("Keep it under three sentences.".into()),
        };
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";

        summarizer
            .summarize(text, &request_options)
            .await
            .expect("summary");

        let calls = client.recorded();
        let (synthesis, chunk_calls) = calls.split_last().expect("calls recorded");
        for call in chunk_calls {
            assert!(!call.user_prompt.contains("Keep it under three sentences."));
        }
        assert!(synthesis
            .user_prompt
            .contains("Keep it under three sentences."));
    }

    #[tokio::test]
    async fn generation_failure_fails_the_whole_request() {
        let limits = SummarizerLimits {
            direct_token_limit: 8,
            chunk_token_limit: 3,
        };
        let summarizer =
            Summarizer::new(Box::new(FailingClient), MODEL, limits).expect("summarizer");
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";

        let error = summarizer.summarize(text, &options()).await.unwrap_err();

        assert!(matches!(error, SummarizeError::Generation(_)));
    }

    #[test]
    fn zero_token_limits_are_rejected() {
        let limits = SummarizerLimits {
            direct_token_limit: 0,
            chunk_token_limit: 3000,
        };
        let error = Summarizer::new(Box::new(FailingClient), MODEL, limits).unwrap_err();
        assert!(matches!(error, SummarizeError::InvalidTokenLimit));
    }
}
