//! HTTP protocol layer module
//!
//! Protocol helpers with no knowledge of the serving logic: MIME lookup,
//! conditional request validators and response builders.

pub mod cond;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_file_response, build_html_response, build_options_response, build_redirect_response,
};
