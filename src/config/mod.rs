//! Configuration handling for the application.
//!
//! Everything the pipeline needs from its environment (inference credential,
//! endpoint base, model identifiers, retry and timeout policy) lives in one
//! immutable [`Config`] value. It is built once at process start with
//! [`Config::from_env`] and then shared by reference; nothing reads the
//! environment after that.

use std::env;
use thiserror::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable names. Public so binaries and tests can refer to them.
pub const ENV_API_KEY: &str = "HF_API_KEY";
pub const ENV_INFERENCE_BASE_URL: &str = "INFERENCE_BASE_URL";
pub const ENV_SUMMARIZATION_MODEL: &str = "SUMMARIZATION_MODEL";
pub const ENV_SENTIMENT_MODEL: &str = "SENTIMENT_MODEL";
pub const ENV_GENERATION_MODEL: &str = "GENERATION_MODEL";
pub const ENV_MAX_RETRIES: &str = "INFERENCE_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "INFERENCE_RETRY_DELAY_MS";
pub const ENV_INFERENCE_TIMEOUT_SECS: &str = "INFERENCE_TIMEOUT_SECS";
pub const ENV_PROCESS_TIMEOUT_SECS: &str = "PROCESS_TIMEOUT_SECS";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";

/// Default values used when environment variables are absent.
const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models/";
const DEFAULT_SUMMARIZATION_MODEL: &str = "facebook/bart-large-cnn";
const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
const DEFAULT_GENERATION_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 300;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Identifiers of the three remote models the analyzers talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub summarization: String,
    pub sentiment: String,
    pub generation: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            summarization: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            sentiment: DEFAULT_SENTIMENT_MODEL.to_string(),
            generation: DEFAULT_GENERATION_MODEL.to_string(),
        }
    }
}

/// Application runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: Option<String>,
    inference_base_url: String,
    models: ModelConfig,
    max_retries: u32,
    retry_delay: Duration,
    inference_timeout: Duration,
    process_timeout: Duration,
    bind_addr: String,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    ///
    /// An empty `HF_API_KEY` counts as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = env::var(ENV_API_KEY).ok().filter(|key| !key.trim().is_empty());
        let inference_base_url =
            env::var(ENV_INFERENCE_BASE_URL).unwrap_or(defaults.inference_base_url);
        let models = ModelConfig {
            summarization: env::var(ENV_SUMMARIZATION_MODEL)
                .unwrap_or(defaults.models.summarization),
            sentiment: env::var(ENV_SENTIMENT_MODEL).unwrap_or(defaults.models.sentiment),
            generation: env::var(ENV_GENERATION_MODEL).unwrap_or(defaults.models.generation),
        };

        let max_retries: u32 = parse_var(ENV_MAX_RETRIES, "max_retries")?
            .unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_retries",
                reason: "must be at least 1".to_string(),
            });
        }

        let retry_delay = parse_var(ENV_RETRY_DELAY_MS, "retry_delay")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay);
        let inference_timeout = parse_var(ENV_INFERENCE_TIMEOUT_SECS, "inference_timeout")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.inference_timeout);
        let process_timeout = parse_var(ENV_PROCESS_TIMEOUT_SECS, "process_timeout")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.process_timeout);
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr);

        Ok(Self {
            api_key,
            inference_base_url,
            models,
            max_retries,
            retry_delay,
            inference_timeout,
            process_timeout,
            bind_addr,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_inference_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.inference_base_url = base_url.into();
        self
    }

    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Clamped to at least one attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub fn with_process_timeout(mut self, timeout: Duration) -> Self {
        self.process_timeout = timeout;
        self
    }

    /// Bearer credential for the inference service, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
    /// Base URL the model id is appended to.
    pub fn inference_base_url(&self) -> &str {
        &self.inference_base_url
    }
    pub fn models(&self) -> &ModelConfig {
        &self.models
    }
    /// Maximum number of attempts per inference call.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
    /// Base delay between inference retries.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
    pub fn inference_timeout(&self) -> Duration {
        self.inference_timeout
    }
    /// Deadline for one whole pipeline run.
    pub fn process_timeout(&self) -> Duration {
        self.process_timeout
    }
    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            inference_base_url: DEFAULT_INFERENCE_BASE_URL.to_string(),
            models: ModelConfig::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            inference_timeout: Duration::from_secs(DEFAULT_INFERENCE_TIMEOUT_SECS),
            process_timeout: Duration::from_secs(DEFAULT_PROCESS_TIMEOUT_SECS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("inference_base_url", &self.inference_base_url)
            .field("models", &self.models)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("inference_timeout", &self.inference_timeout)
            .field("process_timeout", &self.process_timeout)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

fn parse_var<T>(key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field,
                reason: format!("{raw:?}: {e}"),
            }),
        Err(_) => Ok(None),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
