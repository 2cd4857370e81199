//! Static asset resolution for the frontend.
//!
//! The HTTP side of the transport only ever serves files from one
//! directory. Request paths are mapped onto that directory without
//! allowing them to escape it.

use std::path::{Component, Path, PathBuf};

/// Where the frontend lives and how it is reached.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Directory holding the frontend files.
    pub root: PathBuf,
    /// File served for `GET /`.
    pub start_page: String,
    /// Route that upgrades to the UI WebSocket.
    pub socket_route: String,
}

impl AssetConfig {
    /// Default WebSocket route the bundled frontend connects to.
    pub const DEFAULT_SOCKET_ROUTE: &'static str = "/bee";

    /// Creates a config with the default socket route.
    pub fn new(root: impl Into<PathBuf>, start_page: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            start_page: start_page.into(),
            socket_route: Self::DEFAULT_SOCKET_ROUTE.to_string(),
        }
    }

    /// Maps a request path onto a file under `root`.
    ///
    /// `/` maps to the start page. Returns `None` for anything that would
    /// leave the root (`..`, absolute segments, drive prefixes).
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let trimmed = request_path.trim_start_matches('/');
        let relative = if trimmed.is_empty() {
            self.start_page.as_str()
        } else {
            trimmed
        };

        if relative.contains('\\') {
            return None;
        }

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

/// Content type for a served file, by extension.
pub(crate) fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
