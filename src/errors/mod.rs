//! Failure taxonomy and its translation into problem responses

pub mod codes;
pub mod failure;
pub mod response;
pub mod translator;

pub use codes::ProblemType;
pub use failure::{ConstraintViolation, Failure, TypeMismatch};
pub use response::{ProblemDetail, APPLICATION_PROBLEM_JSON};
pub use translator::ProblemTranslator;
