mod signals;

use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::http;
use crate::{Config, ServiceState};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
const LOG_FILE_PREFIX: &str = "ferry.log";

/// Install the global subscriber: compact stdout, plus a daily rolling
/// file when `log_dir` is set.
///
/// The returned guards flush buffered lines on drop and must outlive the
/// service.
pub fn init_logging(config: &Config) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);

    let env_filter = || {
        EnvFilter::builder()
            .with_default_directive(config.log_level.into())
            .from_env_lossy()
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter());

    let file_layer = config.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
        guards.push(file_guard);

        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_writer)
            .with_filter(env_filter())
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guards
}

fn log_panics() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
        tracing::error!(location = location.as_deref().unwrap_or("unknown"), "{info}");
    }));
}

/// Run the service until SIGINT or SIGTERM.
pub async fn spawn_service(config: &Config) -> anyhow::Result<()> {
    let _guards = init_logging(config);
    log_panics();

    let build = common::prelude::build_info();
    tracing::info!(
        version = build.version,
        profile = build.build_profile,
        features = build.build_features,
        built_at = build.build_timestamp,
        listen_addr = %config.listen_addr,
        "starting ferry"
    );

    let signal = signals::install().context("failed to install signal handlers")?;
    let state = ServiceState::from_config(config).context("error creating server state")?;

    let (drain_tx, drain_rx) = watch::channel(());
    let mut server = tokio::spawn(http::run(
        config.listen_addr,
        config.log_level,
        state,
        drain_rx,
    ));

    tokio::select! {
        _ = signals::forward(signal, drain_tx) => {}
        // only reached when the server stops on its own, e.g. the bind failed
        result = &mut server => {
            result.context("HTTP server task failed")??;
            anyhow::bail!("HTTP server stopped before shutdown was requested");
        }
    }

    match timeout(FINAL_SHUTDOWN_TIMEOUT, server).await {
        Ok(result) => {
            result.context("HTTP server task failed")??;
            tracing::info!("service shut down");
            Ok(())
        }
        Err(_) => anyhow::bail!(
            "failed to shut down within {} seconds",
            FINAL_SHUTDOWN_TIMEOUT.as_secs()
        ),
    }
}
