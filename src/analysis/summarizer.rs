use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::analysis::{
    generation::{GenerationParams, generate, instruction_prompt},
    truncate_chars,
};
use crate::config::ModelConfig;
use crate::inference::InferenceBackend;

/// Returned when neither the summarizer nor the generative fallback produced anything.
pub const SUMMARY_UNAVAILABLE: &str = "Content could not be summarized due to API limitations.";

/// Texts shorter than this are returned unchanged.
const MIN_SUMMARIZABLE_CHARS: usize = 100;
const MAX_CHUNK_CHARS: usize = 1000;
/// Shorter chunks are not worth a summarization call.
const MIN_CHUNK_CHARS: usize = 50;
const MAX_SUMMARY_LENGTH: usize = 150;
const MIN_SUMMARY_LENGTH: usize = 30;
const FALLBACK_CONTENT_CHARS: usize = 2000;
/// Joined chunk summaries longer than this get condensed once more.
const MAX_COMBINED_CHARS: usize = 1000;

const SUMMARY_PARAMS: GenerationParams = GenerationParams {
    max_new_tokens: 300,
    temperature: 0.3,
    top_p: Some(0.95),
};

#[derive(Debug, Deserialize)]
struct SummaryText {
    summary_text: String,
}

/// Summary of `text`. Never fails; see [`SUMMARY_UNAVAILABLE`].
#[instrument(skip_all, fields(text_len = text.len()))]
pub async fn summarize(backend: &dyn InferenceBackend, models: &ModelConfig, text: &str) -> String {
    if text.chars().count() < MIN_SUMMARIZABLE_CHARS {
        debug!("text too short to summarize");
        return text.to_string();
    }

    let chunks = chunk_text(text, MAX_CHUNK_CHARS);
    let mut summaries = Vec::new();

    for (index, chunk) in chunks.iter().enumerate() {
        let chunk_chars = chunk.chars().count();
        if chunk_chars < MIN_CHUNK_CHARS {
            continue;
        }

        match summarize_chunk(backend, &models.summarization, chunk, chunk_chars).await {
            Some(summary) => summaries.push(summary),
            None => debug!(chunk = index, "chunk produced no summary"),
        }
    }

    info!(
        chunks = chunks.len(),
        summaries = summaries.len(),
        "chunk summarization finished"
    );

    match summaries.len() {
        0 => summarize_with_generation(backend, &models.generation, text).await,
        1 => summaries.swap_remove(0),
        _ => combine_summaries(backend, &models.generation, &summaries).await,
    }
}

async fn summarize_chunk(
    backend: &dyn InferenceBackend,
    model: &str,
    chunk: &str,
    chunk_chars: usize,
) -> Option<String> {
    let payload = json!({
        "inputs": chunk,
        "parameters": {
            "max_length": MAX_SUMMARY_LENGTH.min(chunk_chars / 2),
            "min_length": MIN_SUMMARY_LENGTH,
            "do_sample": false,
        }
    });

    let response = match backend.call(model, payload).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "chunk summarization failed");
            return None;
        }
    };

    first_summary(response).filter(|summary| !summary.is_empty())
}

fn first_summary(response: Value) -> Option<String> {
    let summaries: Vec<SummaryText> = serde_json::from_value(response).ok()?;
    summaries.into_iter().next().map(|s| s.summary_text)
}

async fn summarize_with_generation(backend: &dyn InferenceBackend, model: &str, text: &str) -> String {
    let prompt = instruction_prompt(&format!(
        "Summarize the following content in about 3-5 sentences:\n\n{}",
        truncate_chars(text, FALLBACK_CONTENT_CHARS)
    ));

    match generate(backend, model, &prompt, SUMMARY_PARAMS).await {
        Ok(summary) => summary.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "generative summary fallback failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

/// Joins partial summaries, condensing them when the join is still long.
///
/// A failed condensation returns the plain join.
async fn combine_summaries(backend: &dyn InferenceBackend, model: &str, summaries: &[String]) -> String {
    let combined = summaries.join(" ");
    if combined.chars().count() <= MAX_COMBINED_CHARS {
        return combined;
    }

    let prompt = instruction_prompt(&format!(
        "Create a concise summary (3-5 sentences) from these partial summaries:\n\n{}",
        combined
    ));

    match generate(backend, model, &prompt, SUMMARY_PARAMS).await {
        Ok(condensed) => condensed.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "condensing partial summaries failed, returning them joined");
            combined
        }
    }
}

/// Sentences of `text`: split at whitespace runs that follow `.`, `!` or `?`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..idx]);
            // swallow the rest of the whitespace run
            let mut next_start = text.len();
            while let Some(&(next_idx, next_ch)) = chars.peek() {
                if !next_ch.is_whitespace() {
                    next_start = next_idx;
                    break;
                }
                chars.next();
            }
            start = next_start;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences.retain(|sentence| !sentence.is_empty());
    sentences
}

/// Greedily packs sentences into chunks of at most `max_chars` characters,
/// counting the single spaces that join them. A sentence longer than
/// `max_chars` becomes a chunk on its own.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for sentence in split_sentences(text) {
        let sentence_chars = sentence.chars().count();

        if current.is_empty() {
            current.push_str(sentence);
            current_chars = sentence_chars;
        } else if current_chars + 1 + sentence_chars <= max_chars {
            current.push(' ');
            current.push_str(sentence);
            current_chars += 1 + sentence_chars;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_chars = sentence_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{InferenceError, MockInferenceBackend};

    fn models() -> ModelConfig {
        ModelConfig {
            summarization: "sum".to_string(),
            sentiment: "sent".to_string(),
            generation: "gen".to_string(),
        }
    }

    /// About 2600 characters: three chunks at the 1000 character cap.
    fn long_text() -> String {
        "The committee reviewed the annual budget and approved new funding for parks. "
            .repeat(35)
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_split_sentences() {
        let text = "First one. Second!  Third?\nFourth without end";
        assert_eq!(
            split_sentences(text),
            vec!["First one.", "Second!", "Third?", "Fourth without end"]
        );
    }

    #[test]
    fn test_split_keeps_inner_punctuation() {
        assert_eq!(split_sentences("Version 1.2 is out. Yes."), vec!["Version 1.2 is out.", "Yes."]);
        assert_eq!(split_sentences("Trailing space. "), vec!["Trailing space."]);
    }

    #[test]
    fn test_chunks_respect_cap() {
        let text = long_text();
        let chunks = chunk_text(&text, MAX_CHUNK_CHARS);

        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= MAX_CHUNK_CHARS);
        }
    }

    #[test]
    fn test_oversized_sentence_is_its_own_chunk() {
        let long_sentence = "word ".repeat(300);
        let text = format!("Short start. {}. Short end.", long_sentence.trim());
        let chunks = chunk_text(&text, MAX_CHUNK_CHARS);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "Short start.");
        assert_eq!(chunks[2], "Short end.");
    }

    #[test]
    fn test_rechunking_joined_chunks_is_stable() {
        let text = format!("{}\n\n  Extra   spacing here!  And more?  Done.", long_text());
        let chunks = chunk_text(&text, MAX_CHUNK_CHARS);
        let rechunked = chunk_text(&chunks.join(" "), MAX_CHUNK_CHARS);

        assert_eq!(chunks, rechunked);
    }

    #[tokio::test]
    async fn test_short_text_returned_unchanged() {
        let mut backend = MockInferenceBackend::new();
        backend.expect_call().never();

        let text = "A short page with barely any content.";
        assert_eq!(summarize(&backend, &models(), text).await, text);
    }

    #[tokio::test]
    async fn test_single_chunk_summary_returned_as_is() {
        let mut backend = MockInferenceBackend::new();
        backend
            .expect_call()
            .times(1)
            .withf(|model, payload| {
                model == "sum"
                    && payload["parameters"]["max_length"] == 150
                    && payload["parameters"]["min_length"] == 30
                    && payload["parameters"]["do_sample"] == false
            })
            .returning(|_, _| Ok(json!([{ "summary_text": "Parks get funding." }])));

        let text = "The committee reviewed the annual budget and approved new funding for parks. ".repeat(5);
        let summary = summarize(&backend, &models(), &text).await;

        assert_eq!(summary, "Parks get funding.");
    }

    #[tokio::test]
    async fn test_max_length_scales_with_short_chunks() {
        let mut backend = MockInferenceBackend::new();
        backend
            .expect_call()
            .times(1)
            .withf(|_, payload| payload["parameters"]["max_length"] == 60)
            .returning(|_, _| Ok(json!([{ "summary_text": "ok" }])));

        // 120 characters in one chunk
        let text = "x".repeat(119) + ".";
        assert_eq!(summarize(&backend, &models(), &text).await, "ok");
    }

    #[tokio::test]
    async fn test_multiple_summaries_are_joined() {
        let mut backend = MockInferenceBackend::new();
        let mut calls = 0;
        backend.expect_call().times(3).returning(move |model, _| {
            assert_eq!(model, "sum");
            calls += 1;
            Ok(json!([{ "summary_text": format!("Part {}.", calls) }]))
        });

        let summary = summarize(&backend, &models(), &long_text()).await;

        assert_eq!(summary, "Part 1. Part 2. Part 3.");
    }

    #[tokio::test]
    async fn test_failed_chunks_are_skipped() {
        let mut backend = MockInferenceBackend::new();
        let mut calls = 0;
        backend.expect_call().times(3).returning(move |_, _| {
            calls += 1;
            match calls {
                2 => Ok(json!([{ "summary_text": "Only survivor." }])),
                _ => Err(InferenceError::RateLimited),
            }
        });

        let summary = summarize(&backend, &models(), &long_text()).await;

        assert_eq!(summary, "Only survivor.");
    }

    #[tokio::test]
    async fn test_long_combination_is_condensed() {
        let mut backend = MockInferenceBackend::new();
        backend.expect_call().times(4).returning(|model, payload| match model {
            "sum" => Ok(json!([{ "summary_text": "s".repeat(400) }])),
            "gen" => {
                assert!(payload["inputs"].as_str().unwrap().contains("partial summaries"));
                Ok(json!([{ "generated_text": "  Condensed summary.  " }]))
            }
            other => panic!("unexpected model {other}"),
        });

        let summary = summarize(&backend, &models(), &long_text()).await;

        assert_eq!(summary, "Condensed summary.");
    }

    #[tokio::test]
    async fn test_failed_condensation_returns_joined_summaries() {
        let mut backend = MockInferenceBackend::new();
        backend.expect_call().times(4).returning(|model, _| match model {
            "sum" => Ok(json!([{ "summary_text": "s".repeat(400) }])),
            _ => Err(InferenceError::RateLimited),
        });

        let summary = summarize(&backend, &models(), &long_text()).await;

        assert_eq!(summary, vec!["s".repeat(400); 3].join(" "));
    }

    #[tokio::test]
    async fn test_generative_fallback_when_no_chunk_summaries() {
        let mut backend = MockInferenceBackend::new();
        backend.expect_call().times(4).returning(|model, _| match model {
            "sum" => Ok(json!([{ "summary_text": "" }])),
            _ => Ok(json!([{ "generated_text": "A generated summary." }])),
        });

        let summary = summarize(&backend, &models(), &long_text()).await;

        assert_eq!(summary, "A generated summary.");
    }

    #[tokio::test]
    async fn test_everything_failing_returns_diagnostic() {
        let mut backend = MockInferenceBackend::new();
        backend.expect_call().times(4).returning(|_, _| {
            Err(InferenceError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "loading".to_string(),
            })
        });

        let summary = summarize(&backend, &models(), &long_text()).await;

        assert_eq!(summary, SUMMARY_UNAVAILABLE);
    }

    #[cfg(feature = "fuzz")]
    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_rechunking_is_idempotent(
                sentences in proptest::collection::vec("[a-z]{1,40}( [a-z]{1,40}){0,30}[.!?]", 0..80)
            ) {
                let text = sentences.join("  ");
                let chunks = chunk_text(&text, MAX_CHUNK_CHARS);
                prop_assert_eq!(chunk_text(&chunks.join(" "), MAX_CHUNK_CHARS), chunks);
            }

            #[test]
            fn test_chunks_never_exceed_cap_unless_single_sentence(
                sentences in proptest::collection::vec("[a-z ]{1,200}[.]", 1..40)
            ) {
                let text = sentences.join(" ");
                for chunk in chunk_text(&text, MAX_CHUNK_CHARS) {
                    prop_assert!(
                        chunk.chars().count() <= MAX_CHUNK_CHARS || split_sentences(&chunk).len() == 1
                    );
                }
            }
        }
    }
}
