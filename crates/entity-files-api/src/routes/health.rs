//! Health check endpoint — for load balancers, monitoring, and Docker health checks.

use axum::{Json, Router, extract::State, routing::get};
use entity_files_common::models::RouteAccess;
use serde::Serialize;
use std::sync::Arc;

use super::RouteEntry;
use crate::AppState;

pub const ROUTES: &[RouteEntry] = &[RouteEntry {
    methods: &["GET", "HEAD"],
    path: "/health",
    access: RouteAccess::PUBLIC,
}];

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

/// Health check router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(ROUTES[0].path, get(health_check))
        .layer(tower_http::compression::CompressionLayer::new())
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
