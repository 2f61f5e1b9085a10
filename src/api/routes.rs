use axum::{middleware, routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    bad_request, entry_not_found, health, internal_server_error, successful_request, AppState,
};
use super::middleware::{logging_middleware, panic_to_failure, problem_middleware};
use super::openapi::ApiDoc;
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health))
        // Reference endpoints
        .route("/200", get(successful_request))
        .route("/400", get(bad_request))
        .route("/404", get(entry_not_found))
        .route("/500", get(internal_server_error))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    with_middleware(routes, state)
}

/// Wrap routes in the middleware stack and attach state.
///
/// Order matters, innermost first: panic capture -> problem translation ->
/// logging -> metrics -> cors -> trace. Logging and metrics therefore see the
/// final translated status.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes
        .layer(CatchPanicLayer::custom(panic_to_failure))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            problem_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
