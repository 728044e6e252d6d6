//! Single-level directory enumeration.
//!
//! The scanner turns the children of one directory into [`Entry`] values,
//! dropping anything hidden by the pattern set and anything that cannot be
//! resolved. Individual failures never abort a scan; only a directory that
//! cannot be opened at all is reported, as [`ScanOutcome::Unreadable`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::entry::{alias_or_original, Aliases, Entry};
use super::patterns::PatternSet;
use super::resolver::ExplorerRoot;

/// Result of scanning one directory.
#[derive(Debug)]
pub enum ScanOutcome {
    /// Visible children in enumeration order.
    Entries(Vec<Entry>),
    /// The directory itself could not be opened.
    Unreadable,
}

impl ScanOutcome {
    /// Entries of a readable directory.
    pub fn entries(&self) -> Option<&[Entry]> {
        match self {
            ScanOutcome::Entries(entries) => Some(entries),
            ScanOutcome::Unreadable => None,
        }
    }
}

/// Whether a directory has no children at all.
///
/// Only the first level is inspected, and hidden children count. A directory
/// that cannot be read is reported as empty.
pub fn is_empty_dir(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut children) => children.next().is_none(),
        Err(_) => true,
    }
}

/// Enumerates directories under a root.
pub struct DirectoryScanner<'a> {
    root: &'a ExplorerRoot,
    patterns: &'a PatternSet,
    aliases: &'a Aliases,
    /// Upper bound on children examined per scan. `0` disables the bound.
    max_entries: usize,
}

impl<'a> DirectoryScanner<'a> {
    /// Create a scanner.
    pub fn new(root: &'a ExplorerRoot, patterns: &'a PatternSet, aliases: &'a Aliases) -> Self {
        Self {
            root,
            patterns,
            aliases,
            max_entries: 0,
        }
    }

    /// Stop examining children after `max_entries` (`0` = unbounded).
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Scan the immediate children of `dir` (a canonical path inside the root).
    pub fn scan(&self, dir: &Path) -> ScanOutcome {
        let children = match fs::read_dir(dir) {
            Ok(children) => children,
            Err(e) => {
                debug!(path = ?dir, error = %e, "Cannot open directory");
                return ScanOutcome::Unreadable;
            }
        };

        let mut entries = Vec::new();
        for (examined, child) in children.enumerate() {
            if self.max_entries > 0 && examined >= self.max_entries {
                warn!(
                    path = ?dir,
                    max_entries = self.max_entries,
                    "Directory scan truncated"
                );
                break;
            }

            let child = match child {
                Ok(c) => c,
                Err(e) => {
                    debug!(path = ?dir, error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let name = child.file_name().to_string_lossy().into_owned();
            if let Some(entry) = self.build_entry(name, &child.path()) {
                entries.push(entry);
            }
        }

        if self.root.is_root(dir) {
            self.append_pinned(&mut entries);
        }

        ScanOutcome::Entries(entries)
    }

    /// Resolve, classify and filter one child.
    fn build_entry(&self, name: String, path: &Path) -> Option<Entry> {
        let canonical = match fs::canonicalize(path) {
            Ok(p) => p,
            Err(e) => {
                debug!(name = %name, error = %e, "Skipping unresolvable entry");
                return None;
            }
        };

        let relative_path = match self.root.relative_path(&canonical) {
            Some(rel) if !rel.is_empty() => rel,
            _ => {
                debug!(name = %name, "Skipping entry that resolves outside of root");
                return None;
            }
        };

        let is_directory = canonical.is_dir();
        if self.patterns.should_ignore(&name, is_directory) {
            return None;
        }

        Some(self.make_entry(name, canonical, relative_path, is_directory))
    }

    fn make_entry(
        &self,
        name: String,
        canonical: PathBuf,
        relative_path: String,
        is_directory: bool,
    ) -> Entry {
        if is_directory {
            let display_name = alias_or_original(self.aliases, &name).to_string();
            let is_empty = is_empty_dir(&canonical);
            Entry::directory(name, display_name, is_empty, canonical, relative_path)
        } else {
            Entry::file(name, canonical, relative_path)
        }
    }

    /// Add configured allow-directory paths that the scan did not produce.
    ///
    /// Each allow-directory pattern is read as a path relative to the root.
    /// Patterns that do not resolve to a directory inside the root are
    /// skipped, as are folders already listed.
    fn append_pinned(&self, entries: &mut Vec<Entry>) {
        for pinned in self.patterns.pinned_dirs() {
            let resolved = match self.root.resolve(pinned) {
                Ok(p) if p.is_dir() && !self.root.is_root(&p) => p,
                _ => continue,
            };

            let Some(relative_path) = self.root.relative_path(&resolved) else {
                continue;
            };
            if entries.iter().any(|e| e.relative_path == relative_path) {
                continue;
            }

            let name = resolved
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| relative_path.clone());

            debug!(folder = %relative_path, "Pinning allowed folder into root listing");
            entries.push(self.make_entry(name, resolved, relative_path, true));
        }
    }
}
