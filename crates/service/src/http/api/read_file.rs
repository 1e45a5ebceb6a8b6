use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::prelude::{DispatchMode, FileBackend, FileError};

use crate::http::error::{detail_response, file_error_status, RequestShapeError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadFileRequest {
    /// Path relative to the root, or an `s3://bucket/key` URI
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadFileResponse {
    pub file_path: String,
    pub content: String,
}

/// `POST /read-file/` with a JSON body.
pub async fn handler(
    State(state): State<ServiceState>,
    payload: Result<Json<ReadFileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ReadFileError> {
    let Json(req) = payload.map_err(RequestShapeError::from)?;
    read(&state, req.file_path).await
}

/// `GET /read-file/?file_path=...`
pub async fn query_handler(
    State(state): State<ServiceState>,
    query: Result<Query<ReadFileRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ReadFileError> {
    let Query(req) = query.map_err(RequestShapeError::from)?;
    read(&state, req.file_path).await
}

/// `GET /read-file/test` reads the configured smoke-test file from local disk.
///
/// Only served in dual mode; a fixed-bucket deployment has no local side.
pub async fn smoke_test_handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, ReadFileError> {
    if state.files().mode() == DispatchMode::FixedBucket {
        return Err(ReadFileError::NotServed);
    }

    let file_path = state.smoke_test_file().to_string();
    tracing::info!(file_path = %file_path, "smoke-test read");

    let content = state.files().local().read(&file_path).await?;
    Ok(Json(ReadFileResponse { file_path, content }))
}

async fn read(state: &ServiceState, file_path: String) -> Result<Json<ReadFileResponse>, ReadFileError> {
    let content = state.files().read(&file_path).await?;
    tracing::info!(file_path = %file_path, bytes = content.len(), "file read");
    Ok(Json(ReadFileResponse { file_path, content }))
}

#[derive(Debug, thiserror::Error)]
pub enum ReadFileError {
    #[error(transparent)]
    Request(#[from] RequestShapeError),
    #[error(transparent)]
    File(#[from] FileError),
    #[error("Not Found")]
    NotServed,
}

impl IntoResponse for ReadFileError {
    fn into_response(self) -> Response {
        match self {
            ReadFileError::Request(e) => e.into_response(),
            ReadFileError::File(e) => detail_response(file_error_status(&e), e.to_string()),
            ReadFileError::NotServed => detail_response(StatusCode::NOT_FOUND, "Not Found"),
        }
    }
}
