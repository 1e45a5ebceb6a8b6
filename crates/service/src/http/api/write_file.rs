use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use common::prelude::FileError;

use crate::http::error::{detail_response, file_error_status, RequestShapeError};
use crate::ServiceState;

pub const WRITE_SUCCESS: &str = "success";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFileRequest {
    /// Path relative to the root, or an `s3://bucket/key` URI
    pub file_path: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFileResponse {
    pub file_path: String,
    pub status: String,
}

/// `POST /write-file/` creates or overwrites the whole file.
pub async fn handler(
    State(state): State<ServiceState>,
    payload: Result<Json<WriteFileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, WriteFileError> {
    let Json(req) = payload.map_err(RequestShapeError::from)?;

    state.files().write(&req.file_path, &req.content).await?;
    tracing::info!(
        file_path = %req.file_path,
        bytes = req.content.len(),
        "file written"
    );

    Ok(Json(WriteFileResponse {
        file_path: req.file_path,
        status: WRITE_SUCCESS.to_string(),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum WriteFileError {
    #[error(transparent)]
    Request(#[from] RequestShapeError),
    #[error(transparent)]
    File(#[from] FileError),
}

impl IntoResponse for WriteFileError {
    fn into_response(self) -> Response {
        match self {
            WriteFileError::Request(e) => e.into_response(),
            WriteFileError::File(e) => detail_response(file_error_status(&e), e.to_string()),
        }
    }
}
