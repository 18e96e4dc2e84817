//! Text extraction for user-supplied document files.
//!
//! The pipeline accepts PDF and plain-text documents. PDF text is pulled via
//! `pdf-extract`; plain text is decoded lossily so byte-level encoding damage does not
//! fail the whole request. Every other extension is rejected before any file IO beyond
//! the initial read.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while obtaining text from a document file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// File extension is not one of the supported document formats.
    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),
    /// Extraction succeeded but produced no usable text.
    #[error("no text could be extracted from the file")]
    EmptyContent,
    /// The file could not be read from disk.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path of the file that could not be read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The PDF body could not be parsed.
    #[error("failed to extract PDF text: {0}")]
    Pdf(String),
}

/// Extract the raw text content of a document file.
///
/// Supported formats are `.pdf` and `.txt` (extension matched case-insensitively).
/// Returns [`ExtractionError::EmptyContent`] when the file yields only whitespace,
/// so callers never hand an empty document to the summarizer.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => {
            let bytes = read_bytes(path)?;
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|error| ExtractionError::Pdf(error.to_string()))?
        }
        "txt" => {
            let bytes = read_bytes(path)?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        other => {
            return Err(ExtractionError::UnsupportedFormat(other.to_string()));
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyContent);
    }

    Ok(text)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractionError> {
    fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_text_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Lecture notes about token budgets.").expect("write fixture");

        let text = extract_text(&path).expect("extraction succeeded");
        assert_eq!(text, "Lecture notes about token budgets.");
    }

    #[test]
    fn decodes_invalid_utf8_lossily() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("mangled.txt");
        fs::write(&path, [b'o', b'k', 0xFF, b'!', b'\n']).expect("write fixture");

        let text = extract_text(&path).expect("extraction succeeded");
        assert!(text.starts_with("ok"));
        assert!(text.contains('!'));
    }

    #[test]
    fn rejects_unsupported_extensions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.docx");
        fs::write(&path, "irrelevant").expect("write fixture");

        let error = extract_text(&path).unwrap_err();
        assert!(matches!(error, ExtractionError::UnsupportedFormat(ext) if ext == "docx"));
    }

    #[test]
    fn rejects_missing_extension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("README");

        let error = extract_text(&path).unwrap_err();
        assert!(matches!(error, ExtractionError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_whitespace_only_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("blank.txt");
        fs::write(&path, "  \n\t \n").expect("write fixture");

        let error = extract_text(&path).unwrap_err();
        assert!(matches!(error, ExtractionError::EmptyContent));
    }

    #[test]
    fn surfaces_io_errors_for_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("gone.txt");

        let error = extract_text(&path).unwrap_err();
        assert!(matches!(error, ExtractionError::Io { .. }));
    }

    #[test]
    fn surfaces_parse_errors_for_damaged_pdfs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf body").expect("write fixture");

        let error = extract_text(&path).unwrap_err();
        assert!(matches!(error, ExtractionError::Pdf(_)));
    }
}
