//! HTTP handlers for the freight enquiry service

pub mod directory;
pub mod enquiry;
pub mod health;

pub use directory::{list_other_services, refresh_other_services};
pub use enquiry::{build_payload, derive_enquiry, get_settings};
pub use health::health_check;
