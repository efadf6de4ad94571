use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::config::Config;
use crate::inference::{InferenceBackend, InferenceError};
use crate::pipeline::{AnalysisResult, PageReport, Pipeline, PipelineError, validate_url};

/// Service-level snapshot of the analysis stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub pipeline: String,
    pub api_key: String,
}

/// Front door for the pipeline: validates input, applies the per-request
/// deadline and ties every run to a shared shutdown token.
pub struct ContentService {
    pipeline: Pipeline,
    config: Arc<Config>,
    shutdown: CancellationToken,
}

impl ContentService {
    pub fn new(config: Config) -> Result<Self, InferenceError> {
        let config = Arc::new(config);
        let pipeline = Pipeline::from_config(config.clone())?;
        Ok(Self::from_pipeline(pipeline, config))
    }

    /// Service backed by a caller-supplied inference backend.
    pub fn with_backend(config: Config, backend: Arc<dyn InferenceBackend>) -> Self {
        let config = Arc::new(config);
        let pipeline = Pipeline::new(config.clone(), backend);
        Self::from_pipeline(pipeline, config)
    }

    fn from_pipeline(pipeline: Pipeline, config: Arc<Config>) -> Self {
        Self {
            pipeline,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Cancelling this token aborts every in-flight run.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn process_website(&self, url: &str) -> AnalysisResult {
        match self.analyze(url).await {
            Ok(report) => AnalysisResult::success(report),
            Err(e) => e.into(),
        }
    }

    /// Like [`ContentService::process_website`], keeping the failure kind.
    #[instrument(skip(self))]
    pub async fn analyze(&self, url: &str) -> Result<PageReport, PipelineError> {
        let url = validate_url(url)?;
        info!("processing website");

        let cancel = self.shutdown.child_token();
        let outcome = with_deadline(
            self.config.process_timeout(),
            &cancel,
            self.pipeline.run(url, &cancel),
        )
        .await;

        match &outcome {
            Ok(report) => info!(title = %report.title, "website processed"),
            Err(e) => error!(error = %e, "website processing failed"),
        }
        outcome
    }

    pub fn health_status(&self) -> HealthStatus {
        let api_key = if self.config.api_key().is_some() {
            "set"
        } else {
            "not set"
        };

        HealthStatus {
            status: "healthy".to_string(),
            pipeline: "healthy".to_string(),
            api_key: api_key.to_string(),
        }
    }
}

/// Runs `fut` for at most `deadline`. On expiry the run is dropped and
/// `cancel` fires so anything sharing the token stops as well.
async fn with_deadline<T, F>(
    deadline: Duration,
    cancel: &CancellationToken,
    fut: F,
) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(outcome) => outcome,
        Err(_) => {
            cancel.cancel();
            Err(PipelineError::TimedOut(deadline))
        }
    }
}
