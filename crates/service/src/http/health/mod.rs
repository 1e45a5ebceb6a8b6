//! Liveness and build information under `/_status`.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use common::prelude::build_info;
use common::version::BuildInfo;

use crate::ServiceState;

#[derive(Debug, Serialize)]
struct Liveness {
    status: &'static str,
}

async fn livez() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

async fn version() -> Json<BuildInfo> {
    Json(build_info())
}

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(livez))
        .route("/version", get(version))
        .with_state(state)
}
