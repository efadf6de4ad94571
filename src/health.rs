use axum::{Json, extract::State};
use tracing::debug;

use crate::app_state::AppState;
use crate::pipeline::service::HealthStatus;

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let health = state.service.health_status();
    debug!(api_key = %health.api_key, "health check");
    Json(health)
}
