use std::any::Any;

use axum::response::Response;
use http::StatusCode;

use crate::http::error::detail_response;

/// Turn a panic caught inside a handler into a `500 {"detail"}` response.
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unexpected internal error".to_string()
    };

    detail_response(StatusCode::INTERNAL_SERVER_ERROR, detail)
}
