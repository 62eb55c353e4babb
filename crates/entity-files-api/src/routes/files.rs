//! Public entity file download.
//!
//! `GET`/`HEAD /entities/{entity_id}/files/{file_name}` streams the file back as an
//! attachment, cached privately for one hour. Unknown files get an empty 404.
//! No session and no CSRF token are required.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use entity_files_common::error::AppResult;
use entity_files_common::models::{FileRequest, RouteAccess};
use std::sync::Arc;

use super::RouteEntry;
use crate::AppState;
use crate::endpoint::DeliveryResponse;

pub const ROUTES: &[RouteEntry] = &[RouteEntry {
    methods: &["GET", "HEAD"],
    path: "/entities/{entity_id}/files/{file_name}",
    access: RouteAccess::PUBLIC,
}];

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(ROUTES[0].path, get(get_entity_file))
}

async fn get_entity_file(
    State(state): State<Arc<AppState>>,
    Path(request): Path<FileRequest>,
) -> AppResult<DeliveryResponse> {
    state
        .files
        .deliver(&request.entity_id, &request.file_name)
        .await
}
