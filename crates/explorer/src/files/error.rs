//! Error types for the listing pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up or serving a listing.
///
/// Only [`ExplorerError::PathRejected`] can happen per request. The other
/// variants are startup failures raised while building a
/// [`FileExplorer`](super::FileExplorer).
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The requested folder does not resolve to an existing path inside the root.
    ///
    /// Carries no path on purpose: the message is returned to clients as is.
    #[error("path is not inside root")]
    PathRejected,

    /// The configured root cannot be used as a containment boundary.
    #[error("invalid root directory {path}: {reason}")]
    InvalidRoot {
        /// Root as configured.
        path: PathBuf,
        /// Why it was refused.
        reason: String,
    },

    /// A configured wildcard pattern could not be compiled.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Pattern as configured.
        pattern: String,
        /// Underlying compile error.
        #[source]
        source: globset::Error,
    },
}
