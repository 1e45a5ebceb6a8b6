//! The ferry HTTP service.
//!
//! Exposes three thin capabilities over HTTP:
//! - read a file from local disk or object storage
//! - write a file to local disk or object storage
//! - create an issue in Jira
//!
//! Everything request-scoped lives in `common`; this crate wires
//! configuration, the Jira client and the axum server together.

pub mod cli;
pub mod config;
pub mod http;
pub mod jira;
pub mod process;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use jira::{JiraClient, JiraConfig};
pub use process::spawn_service;
pub use state::{State as ServiceState, StateSetupError};
