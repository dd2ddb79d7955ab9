//! Access log format module
//!
//! One line per request: `<timestamp> - <message>`, where the message is
//! the quoted request line followed by status and body size.

use chrono::{DateTime, Local};

/// Request/response summary captured for one access log line
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Request timestamp
    pub time: DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// HTTP version label (1.0, 1.1, 2)
    pub http_version: &'static str,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
}

impl AccessLogEntry {
    /// Create a new entry with the current timestamp
    pub fn new(method: String, path: String) -> Self {
        Self {
            time: Local::now(),
            method,
            path,
            http_version: "1.1",
            status: 200,
            body_bytes: 0,
        }
    }

    /// Render the line, e.g.
    /// `04/Aug/2026 10:31:00 - "GET /index.html HTTP/1.1" 200 1234`
    pub fn format_line(&self) -> String {
        format!(
            "{} - \"{} {} HTTP/{}\" {} {}",
            self.time.format("%d/%b/%Y %H:%M:%S"),
            self.method,
            self.path,
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new("GET".to_string(), "/site/index.html".to_string());
        entry.status = 200;
        entry.body_bytes = 512;
        entry
    }

    #[test]
    fn line_contains_request_summary() {
        let line = create_test_entry().format_line();
        assert!(line.contains("\"GET /site/index.html HTTP/1.1\""));
        assert!(line.ends_with(" 200 512"));
    }

    #[test]
    fn line_is_timestamp_dash_message() {
        let line = create_test_entry().format_line();
        let (timestamp, message) = line.split_once(" - ").expect("separator");
        // 04/Aug/2026 10:31:00
        assert_eq!(timestamp.len(), 20);
        assert_eq!(timestamp.matches('/').count(), 2);
        assert_eq!(timestamp.matches(':').count(), 2);
        assert!(message.starts_with('"'));
    }

    #[test]
    fn status_and_bytes_reflect_response() {
        let mut entry = create_test_entry();
        entry.status = 404;
        entry.body_bytes = 13;
        let line = entry.format_line();
        assert!(line.ends_with(" 404 13"));
    }
}
