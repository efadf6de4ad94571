use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// The readable content of one fetched page. Owned by a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub url: Url,
    pub raw_html: String,
    pub text: String,
    /// ISO 639-3 code, only when detection was confident.
    pub language: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Collapses horizontal whitespace inside each line and drops blank lines.
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
