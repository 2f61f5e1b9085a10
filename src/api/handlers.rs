use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;
use utoipa::IntoParams;
use validator::Validate;

use super::extract::{FromQueryParams, QueryParams, ValidatedQuery};
use crate::errors::{Failure, ProblemTranslator, TypeMismatch};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

/// Id reported by the not-found reference endpoint
pub const PLACEHOLDER_ID: &str = "some id";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub translator: ProblemTranslator,
    pub instance_id: String,
}

/// Errors raised deliberately by the reference endpoints
#[derive(Debug, Error)]
pub enum ExampleError {
    #[error("something went wrong")]
    SomethingWentWrong,
}

/// Query parameters for `/400`
#[derive(Debug, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NumberParams {
    /// Any integer greater than or equal to 2
    #[validate(
        required(message = "must not be null"),
        range(min = 2, message = "must be greater than or equal to 2")
    )]
    #[param(minimum = 2)]
    pub number: Option<i32>,
}

impl FromQueryParams for NumberParams {
    fn from_query_params(params: &QueryParams) -> Result<Self, TypeMismatch> {
        Ok(Self {
            number: params.get("number")?,
        })
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "problem-reporter",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Always succeeds
#[utoipa::path(
    get,
    path = "/200",
    tag = "examples",
    responses(
        (status = 200, description = "Success", body = String, content_type = "text/plain")
    )
)]
pub async fn successful_request() -> &'static str {
    "Ok"
}

/// Echoes a validated number
#[utoipa::path(
    get,
    path = "/400",
    tag = "examples",
    params(NumberParams),
    responses(
        (status = 200, description = "Number accepted", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing, mistyped or too small number", body = crate::errors::ProblemDetail, content_type = "application/problem+json")
    )
)]
pub async fn bad_request(
    ValidatedQuery(params): ValidatedQuery<NumberParams>,
) -> Result<String, Failure> {
    // `required` already rejected a missing number
    let number = params
        .number
        .ok_or_else(|| Failure::from(TypeMismatch::new(None, "i32")))?;
    info!("Received number {}", number);
    Ok(format!("Recieved number: {number}"))
}

/// Always reports a missing entry
#[utoipa::path(
    get,
    path = "/404",
    tag = "examples",
    responses(
        (status = 404, description = "Entry not found", body = crate::errors::ProblemDetail, content_type = "application/problem+json")
    )
)]
pub async fn entry_not_found() -> Result<String, Failure> {
    Err(Failure::not_found(PLACEHOLDER_ID))
}

/// Always fails with an internal error
#[utoipa::path(
    get,
    path = "/500",
    tag = "examples",
    responses(
        (status = 500, description = "Internal failure", body = crate::errors::ProblemDetail, content_type = "application/problem+json")
    )
)]
pub async fn internal_server_error() -> Result<String, Failure> {
    Err(Failure::internal(&ExampleError::SomethingWentWrong))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProblemType;

    #[tokio::test]
    async fn test_successful_request() {
        assert_eq!(successful_request().await, "Ok");
    }

    #[tokio::test]
    async fn test_bad_request_echoes_number() {
        let body = bad_request(ValidatedQuery(NumberParams { number: Some(5) }))
            .await
            .unwrap();
        assert_eq!(body, "Recieved number: 5");
    }

    #[tokio::test]
    async fn test_entry_not_found_uses_placeholder() {
        let failure = entry_not_found().await.unwrap_err();
        assert_eq!(failure, Failure::not_found(PLACEHOLDER_ID));
    }

    #[tokio::test]
    async fn test_internal_server_error_names_error_type() {
        let failure = internal_server_error().await.unwrap_err();
        assert_eq!(failure.problem_type(), ProblemType::InternalServerError);
        match failure {
            Failure::Internal { kind, message } => {
                assert!(kind.ends_with("ExampleError"));
                assert_eq!(message, "something went wrong");
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn test_number_params_validation() {
        assert!(NumberParams { number: Some(2) }.validate().is_ok());
        assert!(NumberParams { number: Some(1) }.validate().is_err());
        assert!(NumberParams { number: None }.validate().is_err());
    }
}
