use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

use crate::analysis::{
    generation::{GenerationParams, generate, instruction_prompt},
    keywords::frequent_words,
    truncate_chars,
};
use crate::inference::InferenceBackend;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static META_KEYWORDS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="keywords"]"#).unwrap());

static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

pub const DEFAULT_TITLE: &str = "Untitled Page";
pub const DEFAULT_KEYWORD: &str = "no keywords extracted";

const PROMPT_CONTENT_CHARS: usize = 1000;
/// The prompt ends inside a JSON object so the model continues it.
const JSON_PRIMER: &str = "{\n\"title\": \"";

const METADATA_PARAMS: GenerationParams = GenerationParams {
    max_new_tokens: 200,
    temperature: 0.1,
    top_p: Some(0.95),
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct PartialMetadata {
    title: Option<String>,
    keywords: Vec<String>,
}

/// Title and keywords for a page: markup first, then the generative model,
/// then word frequencies, then fixed defaults.
#[instrument(skip_all, fields(text_len = text.len()))]
pub async fn extract_metadata(
    backend: &dyn InferenceBackend,
    generation_model: &str,
    text: &str,
    html: &str,
) -> Metadata {
    let PartialMetadata {
        mut title,
        mut keywords,
    } = from_markup(html);

    if title.is_none() || keywords.is_empty() {
        debug!(
            has_title = title.is_some(),
            keyword_count = keywords.len(),
            "asking generative model for missing metadata"
        );
        let prompt = metadata_prompt(text);
        match generate(backend, generation_model, &prompt, METADATA_PARAMS).await {
            Ok(output) => match parse_generated(&output) {
                Some(generated) => {
                    if title.is_none() {
                        title = generated.title;
                    }
                    if keywords.is_empty() {
                        keywords = generated.keywords;
                    }
                }
                None => warn!("generated metadata was not valid JSON"),
            },
            Err(e) => warn!(error = %e, "generative metadata extraction failed"),
        }
    }

    if keywords.is_empty() {
        keywords = frequent_words(text);
    }
    if keywords.is_empty() {
        keywords = vec![DEFAULT_KEYWORD.to_string()];
    }

    Metadata {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        keywords,
    }
}

fn from_markup(html: &str) -> PartialMetadata {
    let document = Html::parse_document(html);

    let first_text = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    };

    // A non-empty <h1> wins over <title>.
    let title = first_text(&H1_SELECTOR).or_else(|| first_text(&TITLE_SELECTOR));

    let keywords = document
        .select(&META_KEYWORDS_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(split_keywords)
        .unwrap_or_default();

    PartialMetadata { title, keywords }
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(String::from)
        .collect()
}

fn metadata_prompt(text: &str) -> String {
    let instruction = format!(
        "Given the following web content, extract:\n\
         1. A clear, concise title for the page\n\
         2. 5-10 keywords representing the main topics\n\n\
         Format your response as JSON with 'title' and 'keywords' fields.\n\n\
         Content:\n{}",
        truncate_chars(text, PROMPT_CONTENT_CHARS)
    );
    format!(
        "{}\nHere's the extracted information:\n```json\n{}",
        instruction_prompt(&instruction),
        JSON_PRIMER
    )
}

/// Best-effort parse of the model's continuation into metadata.
///
/// Tries the output as-is first, then with the prompt's primer in front for
/// replies that continue the half-open object.
fn parse_generated(output: &str) -> Option<PartialMetadata> {
    let trimmed = output.trim();
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim_end();

    parse_object(trimmed).or_else(|| parse_object(&format!("{}{}", JSON_PRIMER, trimmed)))
}

fn parse_object(text: &str) -> Option<PartialMetadata> {
    let candidate = JSON_OBJECT.find(text).map(|m| m.as_str()).unwrap_or(text);
    let value: Value = serde_json::from_str(candidate).ok()?;

    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(String::from);

    let keywords = match value.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(raw)) => split_keywords(raw),
        _ => Vec::new(),
    };

    Some(PartialMetadata { title, keywords })
}
