//! Logger module
//!
//! Access and error logging for the server: one flushed line per request,
//! plus lifecycle and error messages.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, ServerState};
use std::net::SocketAddr;

/// Initialize the global writer from the logging configuration.
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access target
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error target
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

pub fn log_server_start(addr: &SocketAddr, state: &ServerState) {
    write_info(&format!(
        "Serving HTTP at http://{addr}/ from {}",
        state.root.display()
    ));
    write_info("Press Ctrl+C to stop the server");
}

pub fn log_server_stop() {
    write_info("Shutdown signal received, closing listener");
}

/// One access line per request, written and flushed before the handler
/// returns.
pub fn log_access(entry: &AccessLogEntry) {
    write_access(&entry.format_line());
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    log_error(&format!("Failed to bind {addr}: {err}"));
}
