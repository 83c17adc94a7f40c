//! Route definitions for the freight enquiry service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/settings", get(handlers::get_settings))
        .nest("/other-services", directory_routes())
        .nest("/enquiries", enquiry_routes())
}

/// Other-services directory routes
fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_other_services))
        .route("/refresh", post(handlers::refresh_other_services))
}

/// Enquiry derivation routes
fn enquiry_routes() -> Router<AppState> {
    Router::new()
        .route("/derive", post(handlers::derive_enquiry))
        .route("/payload", post(handlers::build_payload))
}
