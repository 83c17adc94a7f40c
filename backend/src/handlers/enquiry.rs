//! HTTP handlers for enquiry derivation endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::enquiry::{DeriveInput, DerivedEnquiry, EnquiryPayload, PayloadInput};
use crate::services::EnquiryService;
use crate::AppState;

#[derive(Serialize)]
pub struct SettingsResponse {
    pub debounce_ms: u64,
}

/// Recompute derived cargo fields for a service tree
pub async fn derive_enquiry(
    State(state): State<AppState>,
    Json(input): Json<DeriveInput>,
) -> AppResult<Json<DerivedEnquiry>> {
    let service = EnquiryService::new(state.directory.current().await);
    let derived = service.derive(input)?;
    Ok(Json(derived))
}

/// Validate a service tree and build the submit payload
pub async fn build_payload(
    State(state): State<AppState>,
    Json(input): Json<PayloadInput>,
) -> AppResult<Json<EnquiryPayload>> {
    let service = EnquiryService::new(state.directory.current().await);
    let payload = service.payload(input)?;
    Ok(Json(payload))
}

/// Derivation settings for wizard hosts
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        debounce_ms: state.config.derivation.debounce_ms,
    })
}
