#![deny(missing_docs)]

//! Core library for the docbrief summarization backend.

/// Environment-driven configuration management.
pub mod config;
/// Document text extraction for supported file formats.
pub mod extract;
/// Text-generation client abstraction and provider adapters.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization metrics helpers.
pub mod metrics;
/// Pipeline service joining extraction and summarization.
pub mod service;
/// Chunked summarization core.
pub mod summarize;
