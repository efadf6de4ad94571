use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of analyzing one URL.
///
/// Built only through [`AnalysisResult::success`] and [`AnalysisResult::failure`]:
/// a failure carries nothing but `error`, a success never carries `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    /// ISO 639-3 code of the page text, when it could be detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// The fields of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    pub title: String,
    pub keywords: Vec<String>,
    pub summary: String,
    pub sentiment: String,
    pub raw_content: String,
    pub language: Option<String>,
}

impl AnalysisResult {
    pub fn success(report: PageReport) -> Self {
        Self {
            success: true,
            error: None,
            title: Some(report.title),
            keywords: Some(report.keywords),
            summary: Some(report.summary),
            sentiment: Some(report.sentiment),
            raw_content: Some(report.raw_content),
            language: report.language,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            title: None,
            keywords: None,
            summary: None,
            sentiment: None,
            raw_content: None,
            language: None,
        }
    }
}
