pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    http::HeaderName,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{app_state::AppState, health};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, handlers::analyze),
    components(schemas(
        dtos::AnalyzeRequest,
        crate::pipeline::AnalysisResult,
        crate::pipeline::service::HealthStatus
    )),
    tags(
        (name = "analysis", description = "Web page analysis"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Full HTTP surface: routes, OpenAPI docs, tracing and request ids.
pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/v1/analyze", post(handlers::analyze))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
}
