use axum::response::Response;
use http::StatusCode;

use crate::http::error::detail_response;

pub async fn not_found_handler() -> Response {
    detail_response(StatusCode::NOT_FOUND, "Not Found")
}
