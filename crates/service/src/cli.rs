use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use common::prelude::{BackendConfig, DispatchMode};
use object_store::ObjectStoreConfig;

use crate::config::{Config, ConfigError, DEFAULT_SMOKE_TEST_FILE};
use crate::jira::JiraConfig;

/// Object store backend type for CLI selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ObjectStoreKind {
    /// S3-compatible object storage (default)
    #[default]
    S3,
    /// In-process memory, lost on restart
    Memory,
    /// A directory per bucket on local disk
    Local,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "ferry")]
#[command(version, about = "Serve file reads and writes and Jira issue creation over HTTP")]
pub struct Args {
    /// Address for the HTTP server to listen on
    #[arg(long, env = "FERRY_LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: SocketAddr,

    /// Directory local file paths are confined to (defaults to the working directory)
    #[arg(long, env = "FERRY_ROOT")]
    pub root: Option<PathBuf>,

    /// `dual` routes s3:// references to object storage and everything else to disk,
    /// `fixed-bucket` treats every reference as a key in --bucket
    #[arg(long, env = "FERRY_STORAGE_MODE", default_value_t = DispatchMode::Dual)]
    pub storage_mode: DispatchMode,

    /// Bucket used for bare keys in fixed-bucket mode
    #[arg(long, env = "S3_BUCKET")]
    pub bucket: Option<String>,

    // Object store configuration
    /// Object store backend type
    #[arg(long, value_enum, env = "FERRY_OBJECT_STORE", default_value_t = ObjectStoreKind::S3)]
    pub object_store: ObjectStoreKind,

    /// Directory holding bucket directories (required for --object-store local)
    #[arg(long, env = "FERRY_OBJECT_STORE_PATH")]
    pub object_store_path: Option<PathBuf>,

    /// S3 endpoint override (e.g. http://localhost:9000 for MinIO)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub s3_endpoint: Option<String>,

    /// S3 region override
    #[arg(long, env = "AWS_REGION")]
    pub s3_region: Option<String>,

    // Ticketing configuration
    #[arg(long, env = "JIRA_INSTANCE_URL")]
    pub jira_instance_url: Option<String>,

    #[arg(long, env = "JIRA_USERNAME")]
    pub jira_username: Option<String>,

    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub jira_api_token: Option<String>,

    /// Project used when a request leaves `project_key` empty
    #[arg(long, env = "JIRA_PROJECT_KEY")]
    pub jira_project_key: Option<String>,

    /// Relative path read by `GET /read-file/test`
    #[arg(long, env = "FERRY_SMOKE_TEST_FILE", default_value = DEFAULT_SMOKE_TEST_FILE)]
    pub smoke_test_file: String,

    #[arg(long, env = "FERRY_LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,

    /// Also write daily rolling log files to this directory
    #[arg(long, env = "FERRY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Args {
    fn build_object_store_config(&self) -> Result<ObjectStoreConfig, ConfigError> {
        match self.object_store {
            ObjectStoreKind::Memory => Ok(ObjectStoreConfig::Memory),

            ObjectStoreKind::Local => {
                let path = self
                    .object_store_path
                    .clone()
                    .filter(|p| !p.as_os_str().is_empty())
                    .ok_or(ConfigError::MissingObjectStorePath)?;
                Ok(ObjectStoreConfig::Local { path })
            }

            ObjectStoreKind::S3 => Ok(ObjectStoreConfig::S3 {
                endpoint: non_empty(&self.s3_endpoint),
                region: non_empty(&self.s3_region),
            }),
        }
    }

    fn build_jira_config(&self) -> Result<JiraConfig, ConfigError> {
        let instance_url = non_empty(&self.jira_instance_url)
            .map(|url| Url::parse(&url))
            .transpose()?;

        Ok(JiraConfig {
            instance_url,
            username: non_empty(&self.jira_username),
            api_token: non_empty(&self.jira_api_token),
            project_key: non_empty(&self.jira_project_key),
        })
    }

    /// Resolve the arguments into the service configuration.
    ///
    /// Missing bucket or ticketing settings are not an error here;
    /// requests that need them fail individually.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let root = match self.root.clone().filter(|p| !p.as_os_str().is_empty()) {
            Some(root) => root,
            None => std::env::current_dir()?,
        };

        let backend = BackendConfig {
            mode: self.storage_mode,
            root,
            object_store: self.build_object_store_config()?,
            bucket: non_empty(&self.bucket),
        };

        Ok(Config {
            listen_addr: self.listen_addr,
            backend,
            smoke_test_file: self.smoke_test_file.clone(),
            jira: self.build_jira_config()?,
            log_level: self.log_level,
            log_dir: self.log_dir.clone(),
        })
    }
}
