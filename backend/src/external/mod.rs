//! External API integrations

pub mod directory;

pub use directory::DirectoryClient;
