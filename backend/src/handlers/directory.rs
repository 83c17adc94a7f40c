//! HTTP handlers for the other-services directory

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::DirectorySnapshot;
use crate::AppState;

#[derive(Serialize)]
pub struct RefreshResponse {
    pub entries: usize,
}

/// List the current other-services directory
pub async fn list_other_services(State(state): State<AppState>) -> Json<DirectorySnapshot> {
    Json(state.directory.snapshot().await)
}

/// Force a reload from the configured directory source
pub async fn refresh_other_services(
    State(state): State<AppState>,
) -> AppResult<Json<RefreshResponse>> {
    let entries = state.directory.refresh().await?;
    Ok(Json(RefreshResponse { entries }))
}
