//! Tokenizer resolution and positional chunk decoding.
//!
//! Chunk boundaries are purely positional: the token sequence is cut into consecutive
//! slices of at most the chunk budget, with no overlap, no gaps, and no sentence or
//! paragraph awareness. Decoding a slice back to text is exact because the BPE encoding
//! maps tokens to byte sequences one-to-one, so concatenating the decoded chunks
//! reconstructs the original document.
//!
//! Encoding resolution prefers the generation model's own vocabulary and falls back to
//! a named encoding, then to `cl100k_base`, mirroring how unknown or locally aliased
//! models are handled elsewhere in the ecosystem.

use anyhow::Error as TokenizerError;
use std::sync::Arc;
use tiktoken_rs::{
    CoreBPE, cl100k_base, get_bpe_from_model, o200k_base, p50k_base, p50k_edit, r50k_base,
};

use super::SummarizeError;

/// Resolve the BPE encoding used to count and partition tokens for `model`.
pub(crate) fn encoding_for_model(model: &str) -> Result<Arc<CoreBPE>, SummarizeError> {
    let normalized = model.trim();
    let target = if normalized.is_empty() {
        "cl100k_base"
    } else {
        normalized
    };
    let encoding = resolve_encoding(target).map_err(|source| SummarizeError::Tokenizer {
        model: target.to_string(),
        source,
    })?;
    Ok(Arc::new(encoding))
}

fn resolve_encoding(model: &str) -> Result<CoreBPE, TokenizerError> {
    match get_bpe_from_model(model) {
        Ok(encoding) => Ok(encoding),
        Err(model_err) => {
            tracing::debug!(
                model,
                error = %model_err,
                "Tokenizer model lookup failed; trying encoding name"
            );
            if let Some(candidate) = encoding_from_name(model) {
                candidate
            } else {
                tracing::warn!(
                    model,
                    "Falling back to 'cl100k_base' encoding for token counting"
                );
                cl100k_base()
            }
        }
    }
}

fn encoding_from_name(name: &str) -> Option<Result<CoreBPE, TokenizerError>> {
    match name {
        "cl100k_base" => Some(cl100k_base()),
        "o200k_base" => Some(o200k_base()),
        "p50k_base" => Some(p50k_base()),
        "p50k_edit" => Some(p50k_edit()),
        "r50k_base" | "gpt2" => Some(r50k_base()),
        _ => None,
    }
}

/// Count the tokens of `text` under the given encoding.
pub(crate) fn count_tokens(encoding: &CoreBPE, text: &str) -> usize {
    encoding.encode_ordinary(text).len()
}

/// Partition `text` into consecutive chunks of at most `chunk_token_limit` tokens and
/// decode each chunk back to text, preserving document order.
///
/// The last chunk may be shorter; every other chunk holds exactly the token budget.
pub(crate) fn chunk_document(
    encoding: &CoreBPE,
    text: &str,
    chunk_token_limit: usize,
    model: &str,
) -> Result<Vec<String>, SummarizeError> {
    let tokens = encoding.encode_ordinary(text);
    let mut chunks = Vec::with_capacity(tokens.len().div_ceil(chunk_token_limit));
    for slice in tokens.chunks(chunk_token_limit) {
        let chunk_text =
            encoding
                .decode(slice.to_vec())
                .map_err(|source| SummarizeError::Decode {
                    model: model.to_string(),
                    source,
                })?;
        chunks.push(chunk_text);
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_partition_the_token_sequence() {
        let encoding = cl100k_base().expect("encoding");
        let text = "the quick brown fox jumps over the lazy dog and keeps running through the field";
        let token_count = count_tokens(&encoding, text);
        assert!(token_count > 4);

        let chunks = chunk_document(&encoding, text, 4, "cl100k_base").expect("chunking");

        assert_eq!(chunks.len(), token_count.div_ceil(4));
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(count_tokens(&encoding, chunk) <= 4);
        }
    }

    #[test]
    fn short_input_yields_a_single_chunk() {
        let encoding = cl100k_base().expect("encoding");
        let text = "just a few words";

        let chunks = chunk_document(&encoding, text, 100, "cl100k_base").expect("chunking");

        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn resolves_known_chat_models() {
        let encoding = encoding_for_model("gpt-3.5-turbo").expect("encoding");
        assert!(count_tokens(&encoding, "hello world") > 0);
    }

    #[test]
    fn unknown_models_fall_back_to_default_encoding() {
        let fallback = encoding_for_model("mystery-model-9000").expect("fallback encoding");
        let reference = encoding_for_model("cl100k_base").expect("named encoding");
        let text = "fallback encodings must count tokens consistently";
        assert_eq!(
            count_tokens(&fallback, text),
            count_tokens(&reference, text)
        );
    }
}
