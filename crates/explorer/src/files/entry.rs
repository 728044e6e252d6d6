//! Listing entries.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use protocol::messages::{EntryKind, EntryView};

/// Directory name to display name substitutions.
pub type Aliases = BTreeMap<String, String>;

/// Display name for a directory: its alias when one is configured.
pub fn alias_or_original<'a>(aliases: &'a Aliases, name: &'a str) -> &'a str {
    aliases.get(name).map(String::as_str).unwrap_or(name)
}

/// One child of a listed directory.
///
/// `absolute_path` is canonical and inside the root; `relative_path` is the
/// `/`-joined path below the root and never contains `..`.
#[derive(Debug, Clone)]
pub struct Entry {
    /// On-disk name.
    pub name: String,
    /// Alias for directories, `name` for files.
    pub display_name: String,
    /// Whether the canonical path is a directory.
    pub is_directory: bool,
    /// Directory with no children at all. Listed, but not navigable.
    pub is_empty: bool,
    /// Canonical absolute path.
    pub absolute_path: PathBuf,
    /// Path relative to the root.
    pub relative_path: String,
    modified: OnceLock<Option<SystemTime>>,
}

impl Entry {
    /// A file entry.
    pub fn file(name: String, absolute_path: PathBuf, relative_path: String) -> Self {
        Self {
            display_name: name.clone(),
            name,
            is_directory: false,
            is_empty: false,
            absolute_path,
            relative_path,
            modified: OnceLock::new(),
        }
    }

    /// A directory entry.
    pub fn directory(
        name: String,
        display_name: String,
        is_empty: bool,
        absolute_path: PathBuf,
        relative_path: String,
    ) -> Self {
        Self {
            name,
            display_name,
            is_directory: true,
            is_empty,
            absolute_path,
            relative_path,
            modified: OnceLock::new(),
        }
    }

    /// Preset the modification time instead of reading it from disk.
    pub fn with_modified(self, modified: SystemTime) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Some(modified));
        Self {
            modified: cell,
            ..self
        }
    }

    /// Last modification time, read from disk on first use.
    pub fn modified_at(&self) -> Option<SystemTime> {
        *self.modified.get_or_init(|| {
            fs::metadata(&self.absolute_path)
                .and_then(|m| m.modified())
                .ok()
        })
    }

    /// Substring after the last `.` of the on-disk name, empty without a dot.
    pub fn extension(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }

    /// Whether a client may open this entry as a folder.
    pub fn is_navigable(&self) -> bool {
        self.is_directory && !self.is_empty
    }

    /// Convert to the client-facing view.
    pub fn to_view(&self) -> EntryView {
        let modified = self
            .modified_at()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());

        EntryView {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            kind: if self.is_directory {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            relative_path: self.relative_path.clone(),
            navigable: self.is_navigable(),
            modified,
        }
    }
}

/// Placeholder shown instead of entries when a folder cannot be opened.
pub fn unreadable_placeholder(relative_path: &str) -> EntryView {
    EntryView {
        name: UNREADABLE_LABEL.to_string(),
        display_name: UNREADABLE_LABEL.to_string(),
        kind: EntryKind::Unreadable,
        relative_path: relative_path.to_string(),
        navigable: false,
        modified: None,
    }
}

/// Text of the unreadable placeholder.
pub const UNREADABLE_LABEL: &str = "Cannot open directory.";
