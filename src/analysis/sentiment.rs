use serde_json::{Value, json};
use tracing::{instrument, warn};

use crate::analysis::{
    generation::{self, GenerationParams, instruction_prompt},
    truncate_chars,
};
use crate::config::ModelConfig;
use crate::inference::InferenceBackend;

pub const UNEXPECTED_SENTIMENT: &str = "Sentiment analysis produced unexpected results";

const CLASSIFIER_INPUT_CHARS: usize = 1000;

const FALLBACK_PARAMS: GenerationParams = GenerationParams {
    max_new_tokens: 10,
    temperature: 0.1,
    top_p: None,
};

/// Checked in this order against the generative fallback's reply.
const FALLBACK_LABELS: [&str; 2] = ["POSITIVE", "NEGATIVE"];

/// Human-readable sentiment label for `text`. Never fails.
#[instrument(skip_all, fields(text_len = text.len()))]
pub async fn analyze_sentiment(
    backend: &dyn InferenceBackend,
    models: &ModelConfig,
    text: &str,
) -> String {
    let input = truncate_chars(text, CLASSIFIER_INPUT_CHARS);

    let response = match backend
        .call(&models.sentiment, json!({ "inputs": input }))
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "sentiment classification failed");
            return format!("Sentiment analysis failed: {}", e);
        }
    };

    if let Some(label) = format_classification(&response) {
        return label;
    }

    warn!("classifier returned no usable labels, asking generative model");
    generative_sentiment(backend, &models.generation, input).await
}

fn format_classification(response: &Value) -> Option<String> {
    let first = response.as_array()?.first()?;

    Some(match first {
        Value::Object(record) => {
            let label = record
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN");
            let score = record.get("score").and_then(Value::as_f64).unwrap_or(0.0);
            format!("{} (confidence: {:.2})", label, score)
        }
        Value::String(raw) => format!("Sentiment: {}", raw),
        other => format!("Sentiment: {}", other),
    })
}

async fn generative_sentiment(backend: &dyn InferenceBackend, model: &str, input: &str) -> String {
    let prompt = instruction_prompt(&format!(
        "Analyze the sentiment of the following text. Categorize it as POSITIVE, NEGATIVE, or NEUTRAL.\n\n\
         Text:\n{}\n\n\
         Only respond with one word: POSITIVE, NEGATIVE, or NEUTRAL.",
        input
    ));

    let reply = match backend
        .call(model, generation::payload(&prompt, FALLBACK_PARAMS))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "generative sentiment fallback failed");
            return UNEXPECTED_SENTIMENT.to_string();
        }
    };

    // Any non-empty list counts; a candidate without text reads as neutral
    let Some(first) = reply.as_array().and_then(|candidates| candidates.first()) else {
        warn!("generative sentiment fallback returned no candidates");
        return UNEXPECTED_SENTIMENT.to_string();
    };
    let text = first
        .get("generated_text")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let label = FALLBACK_LABELS
        .into_iter()
        .find(|label| text.contains(label))
        .unwrap_or("NEUTRAL");
    format!("{} (fallback analysis)", label)
}
