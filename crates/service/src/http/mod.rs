//! HTTP routes and server loop for the service.
//!
//! Layout:
//! - `/` and the file/ticket endpoints live in [`api`]
//! - `/_status/livez` and `/_status/version` live in `health`
//! - anything else falls through to a JSON 404

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::sync::watch;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

pub mod api;
pub mod error;
mod handlers;
mod health;

pub use error::ErrorBody;

use crate::ServiceState;

const STATUS_PREFIX: &str = "/_status";

/// Maximum request body size in bytes (10 MiB)
pub const MAX_BODY_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Build the full router with every layer applied.
pub fn router(state: ServiceState, log_level: tracing::Level) -> Router {
    // one access log line per response at `log_level`, failures at `error`
    let access_log = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(log_level))
        .on_response(
            DefaultOnResponse::new()
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    Router::new()
        .merge(api::router(state.clone()))
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_BYTES))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handlers::panic_handler))
        .layer(access_log)
}

/// Serve `router` on `listen_addr` until `shutdown_rx` fires, then let
/// in-flight requests finish.
pub async fn run(
    listen_addr: SocketAddr,
    log_level: tracing::Level,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: listen_addr,
            source,
        })?;
    let local_addr = listener.local_addr().map_err(ServeError::Serve)?;
    tracing::info!(addr = %local_addr, "listening for HTTP requests");

    axum::serve(listener, router(state, log_level))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            tracing::info!("HTTP server draining");
        })
        .await
        .map_err(ServeError::Serve)
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("HTTP server failed: {0}")]
    Serve(std::io::Error),
}
