//! Error bodies shared by every endpoint.
//!
//! Every failure leaves the service as `{"detail": "<message>"}`. Client
//! errors are logged at `warn`, server errors at `error`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::prelude::FileError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Build a `{"detail"}` response, logging it by severity.
pub fn detail_response(status: StatusCode, detail: impl Into<String>) -> Response {
    let detail = detail.into();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), %detail, "request failed");
    } else {
        tracing::warn!(status = status.as_u16(), %detail, "request rejected");
    }
    (status, Json(ErrorBody { detail })).into_response()
}

pub fn file_error_status(err: &FileError) -> StatusCode {
    match err {
        FileError::InvalidPath(_)
        | FileError::PathEscapesRoot(_)
        | FileError::InvalidReference(_)
        | FileError::NotAFile(_)
        | FileError::Decode(_) => StatusCode::BAD_REQUEST,
        FileError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        FileError::NotFound(_) => StatusCode::NOT_FOUND,
        FileError::RootUnavailable(_)
        | FileError::Read(_)
        | FileError::Write(_)
        | FileError::BackendNotConfigured(_)
        | FileError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A request body or query string that does not match the expected schema.
#[derive(Debug, thiserror::Error)]
pub enum RequestShapeError {
    #[error("invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),
    #[error("invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),
}

impl RequestShapeError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestShapeError::Body(rejection)
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
            {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for RequestShapeError {
    fn into_response(self) -> Response {
        detail_response(self.status(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_file_error_status_mapping() {
        let cases = [
            (FileError::InvalidPath("..".into()), StatusCode::BAD_REQUEST),
            (
                FileError::PathEscapesRoot(PathBuf::from("/etc/passwd")),
                StatusCode::BAD_REQUEST,
            ),
            (FileError::InvalidReference("b".into()), StatusCode::BAD_REQUEST),
            (FileError::NotAFile("dir".into()), StatusCode::BAD_REQUEST),
            (FileError::Decode("bin".into()), StatusCode::BAD_REQUEST),
            (FileError::Unauthenticated("no".into()), StatusCode::UNAUTHORIZED),
            (FileError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                FileError::BackendNotConfigured("bucket".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (FileError::Write("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (FileError::Backend("s3".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                FileError::RootUnavailable("/srv".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(file_error_status(&err), status, "{err}");
        }
    }

    #[test]
    fn test_detail_response_status() {
        let response = detail_response(StatusCode::NOT_FOUND, "file not found: a.txt");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
