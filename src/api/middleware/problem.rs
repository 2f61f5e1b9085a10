use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;

use crate::api::handlers::AppState;
use crate::errors::Failure;
use crate::metrics::PROBLEMS_TOTAL;

/// The single translation hook: any response that carries a `Failure` is
/// replaced by the translated problem for the request URI.
pub async fn problem_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let instance = request.uri().to_string();

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<Failure>() {
        Some(failure) => {
            let problem = state.translator.translate(&failure, &instance);
            PROBLEMS_TOTAL
                .with_label_values(&[problem.problem_type.type_uri()])
                .inc();
            problem.into_response()
        }
        None => response,
    }
}

/// Converts a caught handler panic into an internal failure
pub fn panic_to_failure(payload: Box<dyn Any + Send + 'static>) -> Response {
    Failure::from_panic(payload.as_ref()).into_response()
}
