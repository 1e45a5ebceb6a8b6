//! Jira REST client.
//!
//! Credentials are optional at startup. Each `create_issue` call checks
//! them in a fixed order and fails with [`TicketError::Configuration`]
//! naming the first one missing, before any network I/O.

use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use common::prelude::{IssueTracker, TicketError, TicketRequest, TicketResult};

pub const JIRA_INSTANCE_URL: &str = "JIRA_INSTANCE_URL";
pub const JIRA_USERNAME: &str = "JIRA_USERNAME";
pub const JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const JIRA_PROJECT_KEY: &str = "JIRA_PROJECT_KEY";

#[derive(Clone, Default)]
pub struct JiraConfig {
    pub instance_url: Option<Url>,
    pub username: Option<String>,
    pub api_token: Option<String>,
    /// Project used when a request leaves `project_key` empty
    pub project_key: Option<String>,
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("instance_url", &self.instance_url.as_ref().map(Url::as_str))
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("project_key", &self.project_key)
            .finish()
    }
}

struct Credentials<'a> {
    instance_url: &'a Url,
    username: &'a str,
    api_token: &'a str,
    project_key: &'a str,
}

impl JiraConfig {
    fn credentials(&self) -> Result<Credentials<'_>, TicketError> {
        fn present<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, TicketError> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| TicketError::Configuration(name.to_string()))
        }

        let instance_url = self
            .instance_url
            .as_ref()
            .ok_or_else(|| TicketError::Configuration(JIRA_INSTANCE_URL.to_string()))?;
        let username = present(self.username.as_deref(), JIRA_USERNAME)?;
        let api_token = present(self.api_token.as_deref(), JIRA_API_TOKEN)?;
        let project_key = present(self.project_key.as_deref(), JIRA_PROJECT_KEY)?;

        Ok(Credentials {
            instance_url,
            username,
            api_token,
            project_key,
        })
    }
}

pub struct JiraClient {
    http: Client,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self, TicketError> {
        let http = Client::builder()
            .user_agent(concat!("ferry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TicketError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: JiraConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    fn auth_header(username: &str, token: &str) -> String {
        let encoded = BASE64_STANDARD.encode(format!("{username}:{token}"));
        format!("Basic {encoded}")
    }

    fn issue_endpoint(instance_url: &Url) -> String {
        format!(
            "{}/rest/api/2/issue",
            instance_url.as_str().trim_end_matches('/')
        )
    }

    fn browse_url(instance_url: &Url, key: &str) -> String {
        format!("{}/browse/{}", instance_url.as_str().trim_end_matches('/'), key)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn create_issue(&self, request: &TicketRequest) -> Result<TicketResult, TicketError> {
        let credentials = self.config.credentials()?;

        let project_key = match request.project_key.trim() {
            "" => credentials.project_key,
            key => key,
        };
        let body = CreateIssueRequest::new(
            project_key,
            &request.summary,
            &request.description,
            &request.issue_type,
        );

        tracing::info!(
            project = project_key,
            issue_type = %request.issue_type,
            "creating jira issue"
        );

        let response = self
            .http
            .post(Self::issue_endpoint(credentials.instance_url))
            .header(
                AUTHORIZATION,
                Self::auth_header(credentials.username, credentials.api_token),
            )
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TicketError::Transport(format!("failed to call Jira: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED => TicketError::Unauthenticated(text),
                _ => TicketError::Service {
                    status: status.as_u16(),
                    text,
                },
            });
        }

        let created: CreateIssueResponse = response
            .json()
            .await
            .map_err(|e| TicketError::Transport(format!("failed to parse Jira response: {e}")))?;

        let url = created
            .self_url
            .unwrap_or_else(|| Self::browse_url(credentials.instance_url, &created.key));

        tracing::info!(issue_key = %created.key, "jira issue created");

        Ok(TicketResult {
            issue_key: created.key,
            url,
        })
    }
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    fields: IssueFields<'a>,
}

#[derive(Serialize)]
struct IssueFields<'a> {
    project: ProjectRef<'a>,
    summary: &'a str,
    description: &'a str,
    issuetype: IssueTypeRef<'a>,
}

#[derive(Serialize)]
struct ProjectRef<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct IssueTypeRef<'a> {
    name: &'a str,
}

impl<'a> CreateIssueRequest<'a> {
    fn new(project_key: &'a str, summary: &'a str, description: &'a str, issue_type: &'a str) -> Self {
        Self {
            fields: IssueFields {
                project: ProjectRef { key: project_key },
                summary,
                description,
                issuetype: IssueTypeRef { name: issue_type },
            },
        }
    }
}

#[derive(Deserialize)]
struct CreateIssueResponse {
    key: String,
    #[serde(rename = "self")]
    self_url: Option<String>,
}
