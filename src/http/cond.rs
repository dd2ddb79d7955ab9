//! Conditional request module
//!
//! `ETag` generation and evaluation of the `If-None-Match` and
//! `If-Modified-Since` request validators.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs::Metadata;
use std::time::UNIX_EPOCH;

/// RFC 7231 fixdate, e.g. `Tue, 04 Aug 2026 10:31:00 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate an `ETag` from file size and modification time.
///
/// Size and mtime change whenever the content changes in practice, and
/// deriving the tag from metadata keeps the 304 path free of file reads.
pub fn etag_for(meta: &Metadata) -> String {
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs());
    format!("\"{:x}-{:x}\"", meta.len(), mtime)
}

/// Check whether the client's `If-None-Match` header matches `etag`.
///
/// Handles comma-separated lists, the `*` wildcard and `W/` weak prefixes.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').any(|candidate| {
            let candidate = candidate.trim();
            candidate == "*" || candidate.trim_start_matches("W/") == etag
        })
    })
}

/// Format a file's modification time for the `Last-Modified` header.
pub fn http_date(meta: &Metadata) -> Option<String> {
    let modified: DateTime<Utc> = meta.modified().ok()?.into();
    Some(modified.format(HTTP_DATE_FORMAT).to_string())
}

/// Check whether `If-Modified-Since` makes the file fresh for the client.
///
/// HTTP dates carry second granularity, so the comparison is done on whole
/// seconds. Malformed headers are ignored, which means a full response.
pub fn not_modified_since(if_modified_since: Option<&str>, meta: &Metadata) -> bool {
    let Some(header) = if_modified_since else {
        return false;
    };
    let Ok(since) = NaiveDateTime::parse_from_str(header.trim(), HTTP_DATE_FORMAT) else {
        return false;
    };
    let Ok(modified) = meta.modified() else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_meta() -> (TempDir, Metadata) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("page.html");
        fs::write(&path, b"<html>ok</html>").expect("write");
        let meta = fs::metadata(&path).expect("metadata");
        (dir, meta)
    }

    #[test]
    fn etag_is_quoted_and_stable() {
        let (_dir, meta) = file_meta();
        let first = etag_for(&meta);
        let second = etag_for(&meta);
        assert_eq!(first, second);
        assert!(first.starts_with('"'));
        assert!(first.ends_with('"'));
    }

    #[test]
    fn etag_match_handles_lists_wildcard_and_weak() {
        assert!(etag_matches(Some("\"abc\""), "\"abc\""));
        assert!(etag_matches(Some("\"x\", \"abc\""), "\"abc\""));
        assert!(etag_matches(Some("*"), "\"abc\""));
        assert!(etag_matches(Some("W/\"abc\""), "\"abc\""));
        assert!(!etag_matches(Some("\"other\""), "\"abc\""));
        assert!(!etag_matches(None, "\"abc\""));
    }

    #[test]
    fn http_date_round_trips_through_not_modified() {
        let (_dir, meta) = file_meta();
        let date = http_date(&meta).expect("date");
        assert!(not_modified_since(Some(&date), &meta));
    }

    #[test]
    fn stale_if_modified_since_forces_full_response() {
        let (_dir, meta) = file_meta();
        assert!(!not_modified_since(
            Some("Mon, 01 Jan 1990 00:00:00 GMT"),
            &meta
        ));
    }

    #[test]
    fn malformed_if_modified_since_is_ignored() {
        let (_dir, meta) = file_meta();
        assert!(!not_modified_since(Some("not a date"), &meta));
        assert!(!not_modified_since(None, &meta));
    }
}
