use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    api::dtos::AnalyzeRequest,
    app_state::AppState,
    pipeline::{AnalysisResult, PipelineError},
};

#[utoipa::path(
    post,
    path = "/v1/analyze",
    tag = "analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Page analyzed", body = AnalysisResult),
        (status = 400, description = "Malformed URL", body = AnalysisResult),
        (status = 502, description = "Page could not be fetched", body = AnalysisResult),
        (status = 504, description = "Processing timed out or was cancelled", body = AnalysisResult)
    )
)]
pub async fn analyze(State(state): State<AppState>, Json(payload): Json<AnalyzeRequest>) -> Response {
    match state.service.analyze(&payload.url).await {
        Ok(report) => (StatusCode::OK, Json(AnalysisResult::success(report))).into_response(),
        Err(e) => (status_for(&e), Json(AnalysisResult::from(e))).into_response(),
    }
}

fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::Fetch(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Cancelled | PipelineError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}
