//! Request handler module
//!
//! Turns one HTTP request into one HTTP response: method validation,
//! path resolution against the root directory, file serving and access
//! logging.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
