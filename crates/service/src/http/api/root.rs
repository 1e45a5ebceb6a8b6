use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

pub async fn handler() -> Response {
    let msg = serde_json::json!({"message": "Hello World"});
    (StatusCode::OK, Json(msg)).into_response()
}
