//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, header
//! extraction, dispatch to static file serving, and access logging.

use crate::config::ServerState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating what the serving routines need
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

/// Main entry point for HTTP request handling.
///
/// Every request, whatever its outcome, produces exactly one access log
/// line, flushed before this function returns.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let version = version_label(req.version());
    let is_head = method == Method::HEAD;

    let mut response = if let Some(resp) = check_http_method(&method) {
        resp
    } else {
        let ctx = RequestContext {
            path: &path,
            is_head,
            if_none_match: header_string(&req, "if-none-match"),
            if_modified_since: header_string(&req, "if-modified-since"),
        };
        static_files::serve(&ctx, &state).await
    };

    if let Ok(value) = state.config.http.server_name.parse::<HeaderValue>() {
        response.headers_mut().insert("Server", value);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(method.to_string(), path);
        entry.http_version = version;
        entry.status = response.status().as_u16();
        entry.body_bytes = body_len(&response);
        logger::log_access(&entry);
    }

    Ok(response)
}

/// Check the HTTP method; GET and HEAD fall through to serving
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Version label for the access log line
fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

/// Extract a header as an owned string, skipping non-ASCII values
fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Exact body size reported by the `Full` body, for the access log
fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    Body::size_hint(response.body())
        .exact()
        .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_head_fall_through() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());
    }

    #[test]
    fn options_is_answered_directly() {
        let resp = check_http_method(&Method::OPTIONS).expect("response");
        assert_eq!(resp.status(), 204);
    }

    #[test]
    fn other_methods_are_rejected() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let resp = check_http_method(&method).expect("response");
            assert_eq!(resp.status(), 405);
        }
    }

    #[test]
    fn version_labels() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_2), "2");
    }

    #[test]
    fn body_len_reads_the_exact_size() {
        let resp = Response::new(Full::new(Bytes::from_static(b"hello")));
        assert_eq!(body_len(&resp), 5);
    }
}
