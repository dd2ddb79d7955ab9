//! Static file serving module
//!
//! Resolves request paths against the root directory and builds file,
//! directory and error responses.

use crate::config::ServerState;
use crate::handler::router::RequestContext;
use crate::http::{self, cond, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Outcome of resolving a request path against the root directory
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// An existing file inside the root
    File(PathBuf),
    /// An existing directory with no index file, requested with its slash
    Directory(PathBuf),
    /// A directory requested without its trailing slash; redirect target
    Redirect(String),
    /// The path escapes the root
    Forbidden,
    /// Nothing on disk
    NotFound,
}

/// Serve one GET/HEAD request from the root directory
pub async fn serve(ctx: &RequestContext<'_>, state: &ServerState) -> Response<Full<Bytes>> {
    match resolve_request_path(&state.root, ctx.path, &state.config.http.index_files) {
        Resolved::File(file_path) => serve_file(ctx, &file_path).await,
        Resolved::Directory(dir_path) => serve_listing(ctx, &dir_path).await,
        Resolved::Redirect(location) => http::build_redirect_response(&location),
        Resolved::Forbidden => {
            logger::log_warning(&format!("Blocked path escaping root: {}", ctx.path));
            http::build_403_response()
        }
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Resolve a request path to a location inside `root`.
///
/// `root` must already be canonical. The request path is percent-decoded,
/// lexically normalized (`.` dropped, `..` popped), joined to the root and
/// canonicalized; a normalized or canonical path outside the root is
/// Forbidden, never served.
pub fn resolve_request_path(root: &Path, raw_path: &str, index_files: &[String]) -> Resolved {
    let decoded = percent_decode(raw_path);

    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(&decoded).components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(p) => parts.push(p.to_owned()),
                None => return Resolved::NotFound,
            },
            Component::ParentDir => {
                // Popping past the root means the request points outside
                // the served tree
                if parts.pop().is_none() {
                    return Resolved::Forbidden;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    let mut resolved = root.to_path_buf();
    for part in &parts {
        resolved.push(part);
    }

    // Canonicalize so symlinks cannot smuggle the path outside the root
    let Ok(canonical) = resolved.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        return Resolved::Forbidden;
    }

    if canonical.is_dir() {
        if !raw_path.ends_with('/') {
            return Resolved::Redirect(format!("{raw_path}/"));
        }
        for index in index_files {
            let candidate = canonical.join(index);
            if candidate.is_file() {
                return Resolved::File(candidate);
            }
        }
        return Resolved::Directory(canonical);
    }

    Resolved::File(canonical)
}

/// Serve a resolved file, honoring the client's cache validators
async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let meta = match fs::metadata(file_path).await {
        Ok(m) => m,
        Err(_) => return http::build_404_response(),
    };

    let etag = cond::etag_for(&meta);
    let last_modified = cond::http_date(&meta);

    if cond::etag_matches(ctx.if_none_match.as_deref(), &etag)
        || cond::not_modified_since(ctx.if_modified_since.as_deref(), &meta)
    {
        return http::build_304_response(&etag);
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };

    let content_type = mime::content_type_for(file_path.extension().and_then(|e| e.to_str()));
    http::build_file_response(
        Bytes::from(content),
        content_type,
        &etag,
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// Serve a generated listing for a directory with no index file
async fn serve_listing(ctx: &RequestContext<'_>, dir_path: &Path) -> Response<Full<Bytes>> {
    match render_directory_listing(dir_path, ctx.path).await {
        Some(html) => http::build_html_response(html, ctx.is_head),
        None => http::build_404_response(),
    }
}

/// Plain HTML index of a directory: entries sorted by name, subdirectories
/// suffixed with `/`
async fn render_directory_listing(dir: &Path, request_path: &str) -> Option<String> {
    let mut read_dir = fs::read_dir(dir).await.ok()?;

    let mut entries: Vec<String> = Vec::new();
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let title = escape_html(request_path);
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\">\
         <title>Directory listing for {title}</title></head>\n<body>\n\
         <h1>Directory listing for {title}</h1>\n<hr>\n<ul>\n"
    );
    for name in &entries {
        // Hrefs get percent-encoded, visible text gets HTML-escaped
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode(name),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Some(html)
}

/// Decode %XX escapes; invalid or truncated escapes pass through untouched
fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Encode a listing entry name for use as an href; unreserved characters
/// and `/` pass through, everything else becomes %XX
fn percent_encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &byte in name.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Escape text for embedding in the listing page
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
