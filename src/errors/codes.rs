use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Problem types for structured error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProblemType {
    /// Requested entry does not exist
    #[serde(rename = "problem/not_found")]
    NotFound,

    /// One or more declarative parameter constraints failed
    #[serde(rename = "problem/bad_request/invalid_parameters")]
    InvalidParameters,

    /// A parameter could not be coerced to its declared type
    #[serde(rename = "problem/bad_request/unexpected_value_type")]
    UnexpectedValueType,

    /// Unclassified failure
    #[serde(rename = "problem/internal_server_error")]
    InternalServerError,
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_uri())
    }
}

impl ProblemType {
    /// URI-like token used in the `type` field
    pub fn type_uri(&self) -> &'static str {
        match self {
            Self::NotFound => "problem/not_found",
            Self::InvalidParameters => "problem/bad_request/invalid_parameters",
            Self::UnexpectedValueType => "problem/bad_request/unexpected_value_type",
            Self::InternalServerError => "problem/internal_server_error",
        }
    }

    /// Get HTTP status code for this problem type
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InvalidParameters => 400,
            Self::UnexpectedValueType => 400,
            Self::InternalServerError => 500,
        }
    }

    /// Short human-readable summary shared by every occurrence
    pub fn title(&self) -> &'static str {
        match self {
            Self::NotFound => "An entry could not be found",
            Self::InvalidParameters | Self::UnexpectedValueType => "The request was invalid",
            Self::InternalServerError => "An Internal Server Error occurred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ProblemType::NotFound.status_code(), 404);
        assert_eq!(ProblemType::InvalidParameters.status_code(), 400);
        assert_eq!(ProblemType::UnexpectedValueType.status_code(), 400);
        assert_eq!(ProblemType::InternalServerError.status_code(), 500);
    }

    #[test]
    fn test_serialized_token_matches_type_uri() {
        for problem_type in [
            ProblemType::NotFound,
            ProblemType::InvalidParameters,
            ProblemType::UnexpectedValueType,
            ProblemType::InternalServerError,
        ] {
            let json = serde_json::to_value(problem_type).unwrap();
            assert_eq!(json, problem_type.type_uri());
            assert_eq!(problem_type.to_string(), problem_type.type_uri());
        }
    }
}
