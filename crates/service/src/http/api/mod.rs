use axum::routing::{get, post};
use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::Method;
use tower_http::cors::{Any, CorsLayer};

pub mod create_issue;
pub mod read_file;
pub mod root;
pub mod write_file;

// Re-export for convenience
pub use read_file::{ReadFileRequest, ReadFileResponse};
pub use write_file::{WriteFileRequest, WriteFileResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST])
        .allow_headers(vec![ACCEPT, CONTENT_TYPE, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root::handler))
        .route(
            "/read-file/",
            post(read_file::handler).get(read_file::query_handler),
        )
        .route(
            "/read-file",
            post(read_file::handler).get(read_file::query_handler),
        )
        .route("/read-file/test", get(read_file::smoke_test_handler))
        .route("/write-file/", post(write_file::handler))
        .route("/write-file", post(write_file::handler))
        .route("/create-jira-issue/", post(create_issue::handler))
        .route("/create-jira-issue", post(create_issue::handler))
        .with_state(state)
        .layer(cors_layer)
}
