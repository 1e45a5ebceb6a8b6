use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Fields of an issue to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    /// Project to file the issue under; empty means the tracker's default
    pub project_key: String,
    pub summary: String,
    pub description: String,
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
}

fn default_issue_type() -> String {
    DEFAULT_ISSUE_TYPE.to_string()
}

impl TicketRequest {
    pub fn new(
        project_key: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            summary: summary.into(),
            description: description.into(),
            issue_type: default_issue_type(),
        }
    }

    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }
}

/// A created issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResult {
    pub issue_key: String,
    /// Location of the created issue as reported by the tracker
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// A required setting is missing; names the setting
    #[error("ticketing configuration error: missing {0}")]
    Configuration(String),

    #[error("ticketing authentication failed: {0}")]
    Unauthenticated(String),

    /// The tracker answered with a non-success status
    #[error("ticketing service error ({status}): {text}")]
    Service { status: u16, text: String },

    /// The tracker could not be reached or sent an unreadable reply
    #[error("ticketing service unavailable: {0}")]
    Transport(String),
}

/// Capability to create issues in an external tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, request: &TicketRequest) -> Result<TicketResult, TicketError>;
}
