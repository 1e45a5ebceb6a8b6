use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use common::prelude::{BackendConfig, DispatchMode};
use object_store::ObjectStoreConfig;

use crate::jira::JiraConfig;

pub const DEFAULT_LISTEN_PORT: u16 = 8000;
pub const DEFAULT_SMOKE_TEST_FILE: &str = "Cargo.toml";

/// Everything the service needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// address for the HTTP server to listen on
    pub listen_addr: SocketAddr,

    // storage configuration
    pub backend: BackendConfig,
    /// relative path read by `GET /read-file/test`
    pub smoke_test_file: String,

    // ticketing configuration
    /// settings may be partially missing; requests
    ///  fail individually until they are set
    pub jira: JiraConfig,

    // misc
    pub log_level: tracing::Level,
    /// directory for daily rolling log files,
    ///  if not set then only stdout is used
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_LISTEN_PORT),
            backend: BackendConfig {
                mode: DispatchMode::Dual,
                root: PathBuf::from("."),
                object_store: ObjectStoreConfig::default(),
                bucket: None,
            },
            smoke_test_file: DEFAULT_SMOKE_TEST_FILE.to_string(),
            jira: JiraConfig::default(),
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the working directory: {0}")]
    CurrentDir(#[from] std::io::Error),
    #[error("the local object store requires FERRY_OBJECT_STORE_PATH")]
    MissingObjectStorePath,
    #[error("invalid JIRA_INSTANCE_URL: {0}")]
    JiraUrl(#[from] url::ParseError),
}
