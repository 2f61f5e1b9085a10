use utoipa::OpenApi;

use crate::errors::{ProblemDetail, ProblemType};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Problem Reporter",
        version = "0.1.0",
        description = "Reference service that reports every failure as a structured problem body (title, status, type, detail, instance).",
        contact(
            name = "Problem Reporter API",
        )
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::successful_request,
        crate::api::handlers::bad_request,
        crate::api::handlers::entry_not_found,
        crate::api::handlers::internal_server_error,
    ),
    components(
        schemas(
            ProblemDetail,
            ProblemType,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "examples", description = "Endpoints that succeed or fail on purpose"),
    )
)]
pub struct ApiDoc;
