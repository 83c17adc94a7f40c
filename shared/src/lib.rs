//! Shared types and cargo derivation engine for the freight enquiry platform
//!
//! This crate contains the enquiry domain model and the rules that derive
//! chargeable weight and volume from cargo measurements. It is used by the
//! backend and by the browser wizard (via WASM).

pub mod derivation;
pub mod error;
pub mod form;
pub mod models;
pub mod types;
pub mod validation;

pub use derivation::*;
pub use error::*;
pub use form::*;
pub use models::*;
pub use types::*;
pub use validation::*;
