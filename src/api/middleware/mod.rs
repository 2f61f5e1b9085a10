pub mod logging;
pub mod problem;

pub use logging::logging_middleware;
pub use problem::{panic_to_failure, problem_middleware};
