//! Root containment for client supplied folders.
//!
//! Every folder a client asks for goes through [`ExplorerRoot::resolve`]. The
//! result is either a canonical path that is the root itself or lies below it,
//! or [`ExplorerError::PathRejected`].

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::error::ExplorerError;

/// The canonical root directory all listings are confined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerRoot {
    canonical: PathBuf,
}

impl ExplorerRoot {
    /// Canonicalize `root` and use it as the containment boundary.
    ///
    /// Fails when the root does not exist or is not a directory.
    pub fn new(root: &Path) -> Result<Self, ExplorerError> {
        let canonical = fs::canonicalize(root).map_err(|e| ExplorerError::InvalidRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !canonical.is_dir() {
            return Err(ExplorerError::InvalidRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        Ok(Self { canonical })
    }

    /// The canonical root path.
    pub fn path(&self) -> &Path {
        &self.canonical
    }

    /// Whether `path` is the root.
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.canonical
    }

    /// Whether a canonical `path` is the root or lies below it.
    ///
    /// The comparison is component-wise, so a sibling such as `/srv/files2`
    /// is not inside `/srv/files`.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.canonical)
    }

    /// Resolve a client supplied folder against the root.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, ExplorerError> {
        let sanitized = sanitize(requested);
        let relative = sanitized.trim_start_matches('/');

        let target = if relative.is_empty() {
            self.canonical.clone()
        } else {
            self.canonical.join(relative)
        };

        let resolved = match fs::canonicalize(&target) {
            Ok(p) => p,
            Err(e) => {
                debug!(requested, error = %e, "Requested folder does not resolve");
                return Err(ExplorerError::PathRejected);
            }
        };

        if !self.contains(&resolved) {
            warn!(requested, "Rejected folder outside of root");
            return Err(ExplorerError::PathRejected);
        }

        Ok(resolved)
    }

    /// Path of a canonical `path` relative to the root, joined with `/`.
    ///
    /// Returns `None` when `path` is outside the root. The root itself maps to
    /// the empty string.
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let stripped = path.strip_prefix(&self.canonical).ok()?;

        let mut segments = Vec::new();
        for component in stripped.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy()),
                _ => return None,
            }
        }

        Some(segments.join("/"))
    }
}

/// Neutralize traversal tokens in a requested folder.
///
/// NUL bytes are dropped, backslashes become `/`, and every run of two or
/// more dots is removed. Single dots survive, so `notes.txt` and `./docs`
/// still work.
pub fn sanitize(requested: &str) -> String {
    let mut chars = requested
        .chars()
        .filter(|&c| c != '\0')
        .map(|c| if c == '\\' { '/' } else { c })
        .peekable();

    let mut out = String::with_capacity(requested.len());
    while let Some(c) = chars.next() {
        if c == '.' && chars.peek() == Some(&'.') {
            while chars.peek() == Some(&'.') {
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}
