use axum::response::{IntoResponse, Response};
use std::any::Any;
use std::fmt;
use thiserror::Error;
use validator::ValidationErrors;

use super::codes::ProblemType;
use super::translator::ProblemTranslator;

/// Every way a request can fail. Handlers, extractors and the panic layer
/// produce these; only the problem middleware turns them into responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("Entry was not found: {id}")]
    NotFound { id: String },

    #[error("Constraint violations: {}", join_messages(.violations))]
    InvalidParameters { violations: Vec<ConstraintViolation> },

    #[error("Parameter type mismatch: {}", describe_mismatch(.mismatch))]
    InvalidParameterType { mismatch: Option<TypeMismatch> },

    #[error("{kind}: {message}")]
    Internal { kind: String, message: String },
}

/// A single failed declarative constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub field: String,
    pub message: String,
}

/// A raw input that could not be coerced to its declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// Offending raw value, if one was supplied
    pub value: Option<String>,
    pub actual_type: String,
    pub required_type: String,
}

impl TypeMismatch {
    /// Raw query values always arrive as strings.
    pub fn new(value: Option<String>, required_type: impl Into<String>) -> Self {
        let actual_type = if value.is_some() { "String" } else { "null" };
        Self {
            value,
            actual_type: actual_type.to_string(),
            required_type: required_type.into(),
        }
    }

    /// Short name of `T`, e.g. `i32` or `Uuid`
    pub fn type_label<T: ?Sized>() -> &'static str {
        let full = std::any::type_name::<T>();
        // Strip module paths but keep generic arguments intact
        let base = full.split('<').next().unwrap_or(full);
        match base.rfind("::") {
            Some(idx) => &full[idx + 2..],
            None => full,
        }
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value \"{}\" is of type {}, but should be of type {}.",
            self.value.as_deref().unwrap_or("null"),
            self.actual_type,
            self.required_type
        )
    }
}

/// Violation messages joined with `", "`
pub(crate) fn join_messages(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_mismatch(mismatch: &Option<TypeMismatch>) -> String {
    match mismatch {
        Some(m) => m.to_string(),
        None => "unreadable parameters".to_string(),
    }
}

impl Failure {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Wrap any error as an unclassified failure, keeping its type name
    pub fn internal<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::Internal {
            kind: std::any::type_name::<E>().to_string(),
            message: err.to_string(),
        }
    }

    /// Build an internal failure from a caught panic payload
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };

        Self::Internal {
            kind: "panic".to_string(),
            message,
        }
    }

    pub fn problem_type(&self) -> ProblemType {
        match self {
            Self::NotFound { .. } => ProblemType::NotFound,
            Self::InvalidParameters { .. } => ProblemType::InvalidParameters,
            Self::InvalidParameterType { .. } => ProblemType::UnexpectedValueType,
            Self::Internal { .. } => ProblemType::InternalServerError,
        }
    }
}

impl From<TypeMismatch> for Failure {
    fn from(mismatch: TypeMismatch) -> Self {
        Self::InvalidParameterType {
            mismatch: Some(mismatch),
        }
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let violations = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ConstraintViolation {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        Self::InvalidParameters { violations }
    }
}

impl IntoResponse for Failure {
    /// Renders a provisional problem without an instance and attaches the
    /// failure so the problem middleware can translate it with the request URI.
    fn into_response(self) -> Response {
        let problem = ProblemTranslator::default().render(&self, "");
        let mut response = problem.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Params {
        #[validate(range(min = 2, message = "must be greater than or equal to 2"))]
        number: Option<i32>,
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    #[test]
    fn test_type_label_strips_module_path() {
        assert_eq!(TypeMismatch::type_label::<i32>(), "i32");
        assert_eq!(TypeMismatch::type_label::<String>(), "String");
        assert_eq!(TypeMismatch::type_label::<uuid::Uuid>(), "Uuid");
    }

    #[test]
    fn test_type_mismatch_without_value_renders_null() {
        let mismatch = TypeMismatch::new(None, "i32");
        assert_eq!(
            mismatch.to_string(),
            "Value \"null\" is of type null, but should be of type i32."
        );
    }

    #[test]
    fn test_validation_errors_sorted_by_field() {
        let params = Params {
            number: Some(0),
            name: String::new(),
        };
        let failure = Failure::from(params.validate().unwrap_err());
        match failure {
            Failure::InvalidParameters { violations } => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "number"]);
                assert_eq!(violations[1].message, "must be greater than or equal to 2");
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn test_display_joins_violation_messages() {
        let failure = Failure::InvalidParameters {
            violations: vec![
                ConstraintViolation {
                    field: "a".to_string(),
                    message: "must not be null".to_string(),
                },
                ConstraintViolation {
                    field: "b".to_string(),
                    message: "must be greater than or equal to 2".to_string(),
                },
            ],
        };
        assert_eq!(
            failure.to_string(),
            "Constraint violations: must not be null, must be greater than or equal to 2"
        );
    }

    #[test]
    fn test_internal_keeps_type_name_and_message() {
        let err = std::io::Error::other("disk on fire");
        match Failure::internal(&err) {
            Failure::Internal { kind, message } => {
                assert_eq!(kind, std::any::type_name::<std::io::Error>());
                assert_eq!(message, "disk on fire");
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn test_from_panic_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(
            Failure::from_panic(boxed.as_ref()),
            Failure::Internal {
                kind: "panic".to_string(),
                message: "static str".to_string()
            }
        );

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert!(matches!(
            Failure::from_panic(boxed.as_ref()),
            Failure::Internal { message, .. } if message == "owned"
        ));

        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert!(matches!(
            Failure::from_panic(boxed.as_ref()),
            Failure::Internal { message, .. } if message == "unknown panic payload"
        ));
    }

    #[test]
    fn test_into_response_attaches_failure() {
        let failure = Failure::not_found("abc");
        let response = failure.clone().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.extensions().get::<Failure>(), Some(&failure));
    }
}
