//! Pipeline service coordinating extraction, summarization, and metrics.

use crate::{
    config::Config,
    extract::{self, ExtractionError},
    generation::build_generation_client,
    metrics::{MetricsSnapshot, SummaryMetrics},
    summarize::{
        SummarizeError, SummarizeOptions, Summarizer, SummarizerLimits, SummaryStrategy,
    },
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Caller-facing classification of pipeline failures.
///
/// Callers map these onto their own signaling (status codes, exit codes): input
/// problems are client errors and not retryable, generation problems may be retried
/// by re-issuing the whole request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Document text could not be obtained or was empty/unreadable.
    Input,
    /// File extension is not a supported document format.
    UnsupportedFormat,
    /// The generation capability failed or returned unusable output.
    Generation,
}

/// Errors emitted by the summarization pipeline service.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Document text could not be obtained from the file.
    #[error("Failed to read document: {0}")]
    Extraction(#[from] ExtractionError),
    /// Summarization of the extracted text failed.
    #[error("Failed to summarize document: {0}")]
    Summarize(#[from] SummarizeError),
}

impl PipelineError {
    /// Collapse the error onto the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extraction(ExtractionError::UnsupportedFormat(_)) => ErrorKind::UnsupportedFormat,
            Self::Extraction(_) => ErrorKind::Input,
            Self::Summarize(SummarizeError::EmptyContent) => ErrorKind::Input,
            Self::Summarize(_) => ErrorKind::Generation,
        }
    }
}

/// Per-request parameters accepted from the caller.
#[derive(Debug, Clone, Default)]
pub struct SummaryRequest {
    /// Language code for the summary; falls back to the configured default.
    pub language: Option<String>,
    /// Optional free-text instruction layered onto the summarization prompt.
    pub custom_prompt: Option<String>,
}

/// Completed summary handed back to the caller, which owns persistence.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    /// Final summary text.
    pub summary_text: String,
    /// Language the summary was requested in.
    pub language: String,
    /// Path taken to produce the summary.
    pub strategy: SummaryStrategy,
    /// Token count of the extracted document text.
    pub token_count: usize,
    /// Number of chunks produced; zero on the direct path.
    pub chunk_count: usize,
}

/// Abstraction over the pipeline used by callers and test doubles.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Extract a document's text and summarize it.
    async fn summarize_file(
        &self,
        path: &Path,
        request: SummaryRequest,
    ) -> Result<DocumentSummary, PipelineError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Coordinates the full pipeline: file extraction, chunked summarization, and metrics.
///
/// The service owns the generation client and tokenizer through the summarizer, so
/// every caller reuses the same components. Construct it once near process start.
pub struct SummaryService {
    summarizer: Summarizer,
    metrics: Arc<SummaryMetrics>,
    default_language: String,
}

impl SummaryService {
    /// Build the service from configuration.
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let client = build_generation_client(config).map_err(SummarizeError::from)?;
        let limits = SummarizerLimits::from_config(config);
        let summarizer = Summarizer::new(client, &config.generation_model, limits)?;
        Ok(Self {
            summarizer,
            metrics: Arc::new(SummaryMetrics::new()),
            default_language: config.default_language.clone(),
        })
    }

    /// Extract a document's text and summarize it.
    pub async fn summarize_file(
        &self,
        path: &Path,
        request: SummaryRequest,
    ) -> Result<DocumentSummary, PipelineError> {
        tracing::info!(path = %path.display(), "Summarizing document");
        let text = extract::extract_text(path)?;
        let language = request
            .language
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.default_language.clone());
        let options = SummarizeOptions {
            language: language.clone(),
            custom_prompt: request.custom_prompt,
        };

        let outcome = self.summarizer.summarize(&text, &options).await?;

        self.metrics.record_summary(
            outcome.generation_calls as u64,
            matches!(outcome.strategy, SummaryStrategy::Chunked),
        );
        tracing::info!(
            path = %path.display(),
            strategy = ?outcome.strategy,
            token_count = outcome.token_count,
            chunk_count = outcome.chunk_count,
            generation_calls = outcome.generation_calls,
            "Document summarized"
        );

        Ok(DocumentSummary {
            summary_text: outcome.summary_text,
            language,
            strategy: outcome.strategy,
            token_count: outcome.token_count,
            chunk_count: outcome.chunk_count,
        })
    }

    /// Return the current summarization metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_file(
        &self,
        path: &Path,
        request: SummaryRequest,
    ) -> Result<DocumentSummary, PipelineError> {
        SummaryService::summarize_file(self, path, request).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummaryService::metrics_snapshot(self)
    }
}
