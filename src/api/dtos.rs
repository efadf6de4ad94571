use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Page to analyze. A missing scheme defaults to `https://`.
    #[schema(example = "https://example.com/article")]
    pub url: String,
}
