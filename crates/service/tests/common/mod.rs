//! Shared test utilities for the HTTP integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ::common::prelude::{
    BackendConfig, DispatchMode, Dispatcher, IssueTracker, TicketError, TicketRequest,
    TicketResult,
};
use object_store::ObjectStoreConfig;
use service::ServiceState;

pub const SMOKE_TEST_FILE: &str = "smoke.txt";

/// What the fake tracker answers with.
#[derive(Debug, Clone)]
pub enum TrackerOutcome {
    Created,
    Unconfigured,
    Unauthenticated,
    Rejected,
    Panic,
}

/// Records every request and answers with a fixed outcome.
pub struct FakeTracker {
    outcome: TrackerOutcome,
    requests: Mutex<Vec<TicketRequest>>,
}

impl FakeTracker {
    pub fn new(outcome: TrackerOutcome) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TicketRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn create_issue(&self, request: &TicketRequest) -> Result<TicketResult, TicketError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.outcome {
            TrackerOutcome::Created => Ok(TicketResult {
                issue_key: format!("{}-1", request.project_key),
                url: "https://jira.example.com/rest/api/2/issue/10000".to_string(),
            }),
            TrackerOutcome::Unconfigured => {
                Err(TicketError::Configuration("JIRA_INSTANCE_URL".to_string()))
            }
            TrackerOutcome::Unauthenticated => Err(TicketError::Unauthenticated(
                "Basic authentication failed".to_string(),
            )),
            TrackerOutcome::Rejected => Err(TicketError::Service {
                status: 400,
                text: "project is required".to_string(),
            }),
            TrackerOutcome::Panic => panic!("tracker exploded"),
        }
    }
}

/// A router over a temporary root and an in-memory object store.
pub struct TestEnv {
    pub router: Router,
    pub root: TempDir,
    pub tracker: Arc<FakeTracker>,
}

pub fn setup(mode: DispatchMode, bucket: Option<&str>, outcome: TrackerOutcome) -> TestEnv {
    let root = TempDir::new().unwrap();
    let config = BackendConfig {
        mode,
        root: root.path().to_path_buf(),
        object_store: ObjectStoreConfig::Memory,
        bucket: bucket.map(str::to_string),
    };

    let files = Dispatcher::from_config(&config).unwrap();
    let tracker = Arc::new(FakeTracker::new(outcome));
    let state = ServiceState::new(files, tracker.clone(), SMOKE_TEST_FILE);
    let router = service::http::router(state, tracing::Level::INFO);

    TestEnv {
        router,
        root,
        tracker,
    }
}

pub fn setup_dual() -> TestEnv {
    setup(DispatchMode::Dual, None, TrackerOutcome::Created)
}

impl TestEnv {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }
}
