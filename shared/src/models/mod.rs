//! Domain models for the freight enquiry platform

mod enquiry;
mod payload;

pub use enquiry::*;
pub use payload::*;
