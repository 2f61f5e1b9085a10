use tracing::{error, warn};

use super::failure::{join_messages, Failure};
use super::response::ProblemDetail;

/// Prefix of the not-found detail; the missing id follows
pub const NOT_FOUND_DETAIL_PREFIX: &str = "There is no entry with the given id: ";

/// Detail used when a type mismatch carries no usable value information
pub const UNEXPECTED_TYPE_FALLBACK: &str =
    "Some parameters were of an unexpected type. Please check the API specifications.";

/// Detail used for internal failures when details are redacted
pub const REDACTED_INTERNAL_DETAIL: &str = "An unexpected error occurred.";

/// Turns failures into problem bodies.
///
/// Stateless apart from configuration: the same failure and instance always
/// produce the same problem.
#[derive(Debug, Clone)]
pub struct ProblemTranslator {
    expose_internal_details: bool,
}

impl Default for ProblemTranslator {
    fn default() -> Self {
        Self {
            expose_internal_details: true,
        }
    }
}

impl ProblemTranslator {
    pub fn new(expose_internal_details: bool) -> Self {
        Self {
            expose_internal_details,
        }
    }

    /// Translate a failure raised while serving `instance`, logging it
    pub fn translate(&self, failure: &Failure, instance: &str) -> ProblemDetail {
        let problem = self.render(failure, instance);

        match failure {
            Failure::NotFound { .. } => {
                warn!(
                    problem_type = %problem.problem_type,
                    instance = %instance,
                    error = %failure,
                    "An entry could not be found"
                );
            }
            Failure::InvalidParameters { .. } | Failure::InvalidParameterType { .. } => {
                error!(
                    problem_type = %problem.problem_type,
                    instance = %instance,
                    error = %failure,
                    "The request was invalid"
                );
            }
            Failure::Internal { .. } => {
                error!(
                    problem_type = %problem.problem_type,
                    instance = %instance,
                    error = %failure,
                    "An Internal Server Error occurred"
                );
            }
        }

        problem
    }

    /// Build the problem body without side effects
    pub fn render(&self, failure: &Failure, instance: &str) -> ProblemDetail {
        let detail = match failure {
            Failure::NotFound { id } => format!("{NOT_FOUND_DETAIL_PREFIX}{id}"),
            Failure::InvalidParameters { violations } => join_messages(violations),
            Failure::InvalidParameterType { mismatch } => match mismatch {
                Some(m) if !m.required_type.is_empty() => m.to_string(),
                _ => UNEXPECTED_TYPE_FALLBACK.to_string(),
            },
            Failure::Internal { kind, message } => {
                if self.expose_internal_details {
                    format!("Exception: {kind}, Message: {message}")
                } else {
                    REDACTED_INTERNAL_DETAIL.to_string()
                }
            }
        };

        ProblemDetail::new(failure.problem_type(), detail, instance)
    }
}
