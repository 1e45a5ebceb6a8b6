use std::sync::Arc;

use common::prelude::{DispatchMode, Dispatcher, FileError, IssueTracker, TicketError};

use super::config::Config;
use super::jira::JiraClient;

/// Main service state, shared read-only by every request
#[derive(Clone)]
pub struct State {
    files: Arc<Dispatcher>,
    tracker: Arc<dyn IssueTracker>,
    smoke_test_file: Arc<str>,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup storage backends
        let files = Dispatcher::from_config(&config.backend)?;
        tracing::info!(
            mode = %files.mode(),
            root = %files.local().root().display(),
            bucket = ?config.backend.bucket,
            "file backends configured"
        );
        if files.mode() == DispatchMode::FixedBucket && config.backend.bucket.is_none() {
            tracing::warn!("S3_BUCKET is not set, object reads and writes will fail");
        }

        // 2. Setup issue tracker
        let tracker = JiraClient::new(config.jira.clone())?;
        tracing::debug!(jira = ?config.jira, "issue tracker configured");

        Ok(Self::new(
            files,
            Arc::new(tracker),
            config.smoke_test_file.as_str(),
        ))
    }

    pub fn new(
        files: Dispatcher,
        tracker: Arc<dyn IssueTracker>,
        smoke_test_file: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            files: Arc::new(files),
            tracker,
            smoke_test_file: smoke_test_file.into(),
        }
    }

    pub fn files(&self) -> &Dispatcher {
        &self.files
    }

    pub fn tracker(&self) -> &dyn IssueTracker {
        self.tracker.as_ref()
    }

    pub fn smoke_test_file(&self) -> &str {
        &self.smoke_test_file
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("storage setup error: {0}")]
    Storage(#[from] FileError),
    #[error("issue tracker setup error: {0}")]
    IssueTracker(#[from] TicketError),
}
