//! Prompt construction for the summarization paths.
//!
//! Prompts instruct the model to answer in the requested language code; the code is
//! passed through verbatim and never validated against a fixed set.

pub(crate) const DIRECT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes documents.";

pub(crate) const CHUNK_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes parts of a long document.";

pub(crate) const SYNTHESIS_SYSTEM_PROMPT: &str =
    "You are an expert at creating a final, coherent summary from partial summaries.";

/// Prompt for a short document summarized in a single call.
pub(crate) fn direct_prompt(language: &str, custom_prompt: Option<&str>, text: &str) -> String {
    let mut prompt = format!(
        "Summarize the following document in the '{language}' language, keeping only the key points."
    );
    if let Some(custom) = non_empty(custom_prompt) {
        prompt.push(' ');
        prompt.push_str(custom);
    }
    prompt.push_str("\n\n");
    prompt.push_str(text);
    prompt
}

/// Prompt for one part of a document that exceeded the direct threshold.
pub(crate) fn chunk_prompt(language: &str, chunk_text: &str) -> String {
    format!(
        "The following is one part of a longer document. Summarize the key points of this \
         part in the '{language}' language:\n\n{chunk_text}"
    )
}

/// Prompt synthesizing the final summary from partial summaries in document order.
pub(crate) fn synthesis_prompt(
    language: &str,
    custom_prompt: Option<&str>,
    combined_summaries: &str,
) -> String {
    let mut prompt = format!(
        "The following are summaries of consecutive parts of one document. Based on them, \
         write a single final summary covering the entire content in the '{language}' language."
    );
    if let Some(custom) = non_empty(custom_prompt) {
        prompt.push(' ');
        prompt.push_str(custom);
    }
    prompt.push_str("\n\n");
    prompt.push_str(combined_summaries);
    prompt
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_prompt_embeds_custom_instruction_before_text() {
        let prompt = direct_prompt("en", Some("Focus on dates."), "Document body");
        let instruction_end = prompt.find("\n\n").expect("separator");
        assert!(prompt[..instruction_end].contains("Focus on dates."));
        assert!(prompt.ends_with("Document body"));
    }

    #[test]
    fn direct_prompt_ignores_blank_custom_instruction() {
        let prompt = direct_prompt("en", Some("   "), "Document body");
        assert!(!prompt.contains("   \n"));
        assert!(prompt.contains("key points.\n\n"));
    }

    #[test]
    fn chunk_prompt_names_the_language() {
        let prompt = chunk_prompt("ko", "part of the text");
        assert!(prompt.contains("'ko'"));
        assert!(prompt.ends_with("part of the text"));
    }

    #[test]
    fn synthesis_prompt_carries_combined_summaries_verbatim() {
        let combined = "first part\n\nsecond part";
        let prompt = synthesis_prompt("en", None, combined);
        assert!(prompt.ends_with(combined));
    }
}
