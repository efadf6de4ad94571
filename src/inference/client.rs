use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::inference::{
    InferenceBackend,
    backoff::rate_limit_delay,
    errors::InferenceError,
};

/// HTTP client for a hosted inference API (`POST <base_url><model_id>`).
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl InferenceClient {
    pub fn new(config: &Config) -> Result<Self, InferenceError> {
        let mut headers = header::HeaderMap::new();
        if let Some(api_key) = config.api_key() {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| InferenceError::Client(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(config.inference_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| InferenceError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.inference_base_url().to_string(),
            max_retries: config.max_retries().max(1),
            retry_delay: config.retry_delay(),
        })
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}{}", self.base_url, model_id)
    }
}

#[async_trait]
impl InferenceBackend for InferenceClient {
    /// Bounded retry loop. `429` backs off linearly, transport failures back off
    /// by the fixed base delay, any other non-200 status returns immediately.
    #[instrument(skip(self, payload), fields(model = %model_id))]
    async fn call(&self, model_id: &str, payload: Value) -> Result<Value, InferenceError> {
        let endpoint = self.endpoint(model_id);

        for attempt in 1..=self.max_retries {
            let is_last = attempt == self.max_retries;

            let response = match self.http.post(&endpoint).json(&payload).send().await {
                Ok(response) => response,
                Err(e) => {
                    if is_last {
                        return Err(InferenceError::Transport(e.to_string()));
                    }
                    warn!(attempt, error = %e, "inference request failed, retrying");
                    sleep(self.retry_delay).await;
                    continue;
                }
            };

            match response.status() {
                StatusCode::OK => match response.json::<Value>().await {
                    Ok(body) => {
                        debug!(attempt, "inference call succeeded");
                        return Ok(body);
                    }
                    Err(e) => {
                        if is_last {
                            return Err(InferenceError::Transport(e.to_string()));
                        }
                        warn!(attempt, error = %e, "unreadable inference response, retrying");
                        sleep(self.retry_delay).await;
                    }
                },
                StatusCode::TOO_MANY_REQUESTS => {
                    if is_last {
                        warn!(attempt, "inference rate limit persisted, giving up");
                        return Err(InferenceError::RateLimited);
                    }
                    let delay = rate_limit_delay(attempt, self.retry_delay);
                    warn!(attempt, delay_ms = delay.as_millis() as u64, "rate limited, backing off");
                    sleep(delay).await;
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(InferenceError::Status { status, body });
                }
            }
        }

        // max_retries is at least 1, so the loop always returns
        Err(InferenceError::RateLimited)
    }
}
