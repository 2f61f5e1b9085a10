use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::codes::ProblemType;

/// Media type for problem bodies (RFC 9457)
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Structured problem body returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetail {
    /// Short summary of the failure category
    pub title: String,
    /// HTTP status code, always equal to the response status
    pub status: u16,
    /// Problem type token for programmatic matching
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    /// Explanation specific to this occurrence
    pub detail: String,
    /// URI of the request that produced the failure
    pub instance: String,
}

impl ProblemDetail {
    /// Create a problem of the given type; title and status follow from the type
    pub fn new(
        problem_type: ProblemType,
        detail: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            title: problem_type.title().to_string(),
            status: problem_type.status_code(),
            problem_type,
            detail: detail.into(),
            instance: instance.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProblemDetail {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_serialization_field_order() {
        let problem = ProblemDetail::new(ProblemType::NotFound, "gone", "/404");
        let json = serde_json::to_string(&problem).unwrap();
        assert_eq!(
            json,
            r#"{"title":"An entry could not be found","status":404,"type":"problem/not_found","detail":"gone","instance":"/404"}"#
        );
    }

    #[test]
    fn test_into_response_sets_status_and_content_type() {
        let problem = ProblemDetail::new(ProblemType::InvalidParameters, "bad", "/400");
        let response = problem.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_PROBLEM_JSON
        );
    }

    #[test]
    fn test_into_response_status_internal_error() {
        let problem = ProblemDetail::new(ProblemType::InternalServerError, "boom", "/500");
        let response = problem.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
