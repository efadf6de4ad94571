//! Fetch → Extract → Metadata → Summarize → Sentiment.

pub mod result;
pub mod service;
pub mod validation;

pub use result::{AnalysisResult, PageReport};
pub use service::ContentService;
pub use validation::{ValidationError, validate_url};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::analysis::{analyze_sentiment, extract_metadata, summarize};
use crate::config::Config;
use crate::extractor;
use crate::fetcher::{self, FetchError};
use crate::inference::{InferenceBackend, InferenceClient, InferenceError};

/// Reasons a run ends without an analysis.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Processing cancelled")]
    Cancelled,

    #[error("Processing timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

impl From<PipelineError> for AnalysisResult {
    fn from(err: PipelineError) -> Self {
        AnalysisResult::failure(err.to_string())
    }
}

/// The analysis pipeline. Holds only read-only state, so one instance can
/// serve any number of concurrent runs.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<Config>,
    backend: Arc<dyn InferenceBackend>,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, backend: Arc<dyn InferenceBackend>) -> Self {
        Self { config, backend }
    }

    /// Pipeline talking to the inference service described by `config`.
    pub fn from_config(config: Arc<Config>) -> Result<Self, InferenceError> {
        let client = InferenceClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn process(&self, url: &str) -> AnalysisResult {
        self.process_with_cancel(url, &CancellationToken::new()).await
    }

    /// Like [`Pipeline::process`], but stops as soon as `cancel` fires, either
    /// between stages or by dropping the in-flight request.
    pub async fn process_with_cancel(&self, url: &str, cancel: &CancellationToken) -> AnalysisResult {
        let span = info_span!("pipeline", run_id = %Uuid::new_v4(), url = %url);

        match self.run(url, cancel).instrument(span).await {
            Ok(report) => AnalysisResult::success(report),
            Err(e) => e.into(),
        }
    }

    /// One pipeline run. Only a fetch failure or cancellation ends it early;
    /// analyzer failures degrade to best-effort values in the report.
    pub async fn run(&self, url: &str, cancel: &CancellationToken) -> Result<PageReport, PipelineError> {
        let response = match stage(cancel, fetcher::fetch(url)).await? {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, transport = e.is_transport(), "fetch failed");
                return Err(e.into());
            }
        };
        info!(status = %response.status, charset = ?response.charset, "page fetched");

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        let page = extractor::build_page(response);
        info!(
            text_chars = page.text.chars().count(),
            language = page.language.as_deref().unwrap_or("unknown"),
            "content extracted"
        );

        let backend = self.backend.as_ref();
        let models = self.config.models();

        let metadata = stage(
            cancel,
            extract_metadata(backend, &models.generation, &page.text, &page.raw_html),
        )
        .await?;
        let summary = stage(cancel, summarize(backend, models, &page.text)).await?;
        let sentiment = stage(cancel, analyze_sentiment(backend, models, &page.text)).await?;

        info!(title = %metadata.title, keywords = metadata.keywords.len(), "analysis complete");

        Ok(PageReport {
            title: metadata.title,
            keywords: metadata.keywords,
            summary,
            sentiment,
            raw_content: page.text,
            language: page.language,
        })
    }
}

/// Runs one stage unless `cancel` fires first; a cancelled stage's future is dropped.
async fn stage<F: Future>(cancel: &CancellationToken, fut: F) -> Result<F::Output, PipelineError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
        output = fut => Ok(output),
    }
}
