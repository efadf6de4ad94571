//! Analyzers that turn page text into title, keywords, summary and sentiment.
//!
//! None of them can fail: inference and parse errors are logged and absorbed
//! into a fallback answer or a diagnostic string.

pub mod generation;
pub mod keywords;
pub mod metadata;
pub mod sentiment;
pub mod summarizer;

pub use metadata::{Metadata, extract_metadata};
pub use sentiment::analyze_sentiment;
pub use summarizer::summarize;

use thiserror::Error;

use crate::inference::InferenceError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("unexpected model output: {0}")]
    Parse(String),
}

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
