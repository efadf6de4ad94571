//! Remote text-inference access.
//!
//! Every analyzer talks to the inference service through [`InferenceBackend`],
//! which is the only external dependency they have. [`InferenceClient`] is the
//! HTTP implementation with bounded retry.

pub mod backoff;
pub mod client;
pub mod errors;

pub use client::InferenceClient;
pub use errors::InferenceError;

use async_trait::async_trait;
use serde_json::Value;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Evaluate `model_id` against a JSON payload.
    async fn call(&self, model_id: &str, payload: Value) -> Result<Value, InferenceError>;
}
