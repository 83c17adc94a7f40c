//! Business logic services for the freight enquiry service

pub mod directory;
pub mod enquiry;

pub use directory::{DirectoryService, DirectorySnapshot};
pub use enquiry::EnquiryService;
