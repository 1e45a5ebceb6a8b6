use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use common::prelude::{TicketError, TicketRequest};

use crate::http::error::{detail_response, RequestShapeError};
use crate::ServiceState;

/// `POST /create-jira-issue/` files an issue and returns its key and location.
pub async fn handler(
    State(state): State<ServiceState>,
    payload: Result<Json<TicketRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CreateIssueError> {
    let Json(req) = payload.map_err(RequestShapeError::from)?;
    tracing::info!(
        project_key = %req.project_key,
        issue_type = %req.issue_type,
        "create issue request"
    );

    let created = state.tracker().create_issue(&req).await?;
    Ok(Json(created))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateIssueError {
    #[error(transparent)]
    Request(#[from] RequestShapeError),
    #[error(transparent)]
    Ticket(#[from] TicketError),
}

impl IntoResponse for CreateIssueError {
    fn into_response(self) -> Response {
        match self {
            CreateIssueError::Request(e) => e.into_response(),
            CreateIssueError::Ticket(e) => {
                let status = match &e {
                    TicketError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
                    TicketError::Configuration(_)
                    | TicketError::Service { .. }
                    | TicketError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                detail_response(status, e.to_string())
            }
        }
    }
}
