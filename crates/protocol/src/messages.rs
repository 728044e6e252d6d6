//! Protocol message definitions for the explorer.
//!
//! This module defines the request/response types exchanged between a client
//! and the explorer. Messages travel inside an [`Envelope`] that can be encoded
//! as JSON (line-oriented transports, CLI output) or MessagePack.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Current protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Page size servers fall back to unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort mode used when a request does not specify one.
pub const DEFAULT_SORT: &str = "nameAsc";

/// Message returned for any folder that does not resolve inside the root.
pub const PATH_REJECTED_MESSAGE: &str = "Invalid directory access. Path is not inside root";

/// Label of the first breadcrumb.
pub const HOME_LABEL: &str = "Home";

/// Envelope wrapper for all protocol messages.
///
/// The envelope provides versioning and sequence numbers so a client can
/// match responses to requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Protocol version for compatibility checking.
    pub version: u8,
    /// Sequence number, echoed back in the response.
    pub sequence: u64,
    /// The actual message payload.
    pub payload: Message,
}

impl Envelope {
    /// Create a new envelope with the current protocol version.
    pub fn new(sequence: u64, payload: Message) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            sequence,
            payload,
        }
    }

    /// Build the response envelope for this request.
    pub fn reply(&self, payload: Message) -> Self {
        Self::new(self.sequence, payload)
    }

    /// Reject envelopes produced by a different protocol version.
    pub fn check_version(&self) -> Result<()> {
        if self.version != PROTOCOL_VERSION {
            return Err(ProtocolError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                got: self.version,
            });
        }
        Ok(())
    }

    /// Serialize the envelope to a single-line JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize an envelope from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the envelope to MessagePack bytes.
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }

    /// Deserialize an envelope from MessagePack bytes.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Top-level message enum containing all message types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Message {
    /// Request a page of a directory listing.
    ListingRequest(ListingRequest),
    /// Page of a directory listing plus breadcrumb.
    ListingResponse(ListingResponse),
    /// Error response.
    Error(ErrorMessage),
}

// ============================================================================
// Listing Messages
// ============================================================================

/// Request for one page of a directory listing.
///
/// Every field is optional on the wire; missing fields take the defaults
/// below. `sort` is kept as free text because unknown modes fall back to
/// name ordering instead of failing the request. A missing `pageSize` is
/// left to the server, which applies its configured default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingRequest {
    /// Folder relative to the root, `/`-separated. Empty means the root.
    pub folder: String,
    /// Wildcard filter applied to entry names. Empty keeps everything.
    pub filter: String,
    /// Sort mode name (`nameAsc`, `nameDesc`, `extAsc`, `extDesc`, `dateAsc`, `dateDesc`).
    pub sort: String,
    /// 1-based page number.
    pub page: u32,
    /// Entries per page, `None` for the server default.
    pub page_size: Option<u32>,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            folder: String::new(),
            filter: String::new(),
            sort: DEFAULT_SORT.to_string(),
            page: 1,
            page_size: None,
        }
    }
}

impl ListingRequest {
    /// Request the first page of `folder` with default settings.
    pub fn for_folder(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }
}

/// One page of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    /// Chain of ancestors from the root to the listed folder.
    pub breadcrumb: Vec<Breadcrumb>,
    /// Entries on the requested page.
    pub entries: Vec<EntryView>,
    /// Number of entries after filtering, before pagination.
    pub total_count: u64,
    /// Page actually returned (after clamping).
    pub page: u32,
    /// Number of pages at the requested page size (at least 1).
    pub total_pages: u32,
}

/// A breadcrumb segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Text shown for the segment.
    pub label: String,
    /// Folder to request when the segment is selected.
    pub folder: String,
}

impl Breadcrumb {
    /// The root crumb every breadcrumb starts with.
    pub fn home() -> Self {
        Self {
            label: HOME_LABEL.to_string(),
            folder: String::new(),
        }
    }
}

/// A listed entry as seen by clients.
///
/// Absolute paths are never exposed; `relative_path` is the only identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    /// On-disk name.
    pub name: String,
    /// Name to display (directory alias, or the on-disk name).
    pub display_name: String,
    /// Entry type.
    pub kind: EntryKind,
    /// Path relative to the root, `/`-separated.
    pub relative_path: String,
    /// Whether a client may open this directory.
    pub navigable: bool,
    /// Last modified timestamp (Unix epoch seconds).
    pub modified: Option<u64>,
}

/// Type of listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directory.
    Directory,
    /// Regular file (or anything that is not a directory).
    File,
    /// Placeholder shown when the folder itself cannot be opened.
    Unreadable,
}

// ============================================================================
// Error Messages
// ============================================================================

/// Error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Error code for programmatic handling.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Optional context.
    pub context: Option<String>,
    /// Whether retrying the same request could succeed.
    pub recoverable: bool,
}

/// Error codes for common error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Unknown or unspecified error.
    Unknown,
    /// Invalid request or parameters.
    InvalidRequest,
    /// Server-side error.
    InternalError,
    /// Access outside the permitted root.
    PermissionDenied,
    /// Protocol version mismatch.
    VersionMismatch,
}

impl ErrorMessage {
    /// The response for a folder that does not resolve inside the root.
    pub fn path_rejected() -> Self {
        Self {
            code: ErrorCode::PermissionDenied,
            message: PATH_REJECTED_MESSAGE.to_string(),
            context: None,
            recoverable: false,
        }
    }
}
