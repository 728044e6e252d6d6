//! Wildcard matching for ignore/allow lists and the user filter.
//!
//! Patterns support exactly one metacharacter: `*`, matching zero or more
//! characters. Everything else is literal and matching is case-insensitive.
//! A pattern without `*` is an exact name match; the user filter is the one
//! place where a bare word is widened to a substring match.

use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use super::error::ExplorerError;

/// Escape every glob metacharacter except `*` and collapse runs of `*`.
///
/// Collapsing keeps `**` from being read as a recursive wildcard.
pub fn escape_wildcard(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    let mut previous_star = false;
    for ch in pattern.chars() {
        match ch {
            '*' if previous_star => {}
            '*' => escaped.push('*'),
            '?' | '[' | ']' | '{' | '}' | '!' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
        previous_star = ch == '*';
    }
    escaped
}

/// A single compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    matcher: GlobMatcher,
}

impl WildcardPattern {
    /// Compile an ignore/allow style pattern (exact match unless `*` is used).
    pub fn new(pattern: &str) -> Result<Self, ExplorerError> {
        let matcher = build_glob(pattern)?.compile_matcher();
        Ok(Self { matcher })
    }

    /// Compile a user filter. A filter without `*` matches as a substring.
    pub fn filter(filter: &str) -> Result<Self, ExplorerError> {
        if filter.contains('*') {
            Self::new(filter)
        } else {
            Self::new(&format!("*{}*", filter))
        }
    }

    /// Whether `name` matches.
    pub fn is_match(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

/// Match `name` against an ignore/allow style pattern.
pub fn matches(pattern: &str, name: &str) -> bool {
    WildcardPattern::new(pattern)
        .map(|p| p.is_match(name))
        .unwrap_or(false)
}

/// Match `name` against a user filter.
pub fn filter_matches(filter: &str, name: &str) -> bool {
    WildcardPattern::filter(filter)
        .map(|p| p.is_match(name))
        .unwrap_or(false)
}

fn build_glob(pattern: &str) -> Result<globset::Glob, ExplorerError> {
    GlobBuilder::new(&escape_wildcard(pattern))
        .case_insensitive(true)
        .literal_separator(false)
        .backslash_escape(true)
        .build()
        .map_err(|source| ExplorerError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn build_set(patterns: &[String]) -> Result<GlobSet, ExplorerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(build_glob(pattern)?);
    }
    builder.build().map_err(|source| ExplorerError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// The four pattern lists as configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternLists {
    /// Directory names to hide.
    pub ignore_dirs: Vec<String>,
    /// File names to hide.
    pub ignore_files: Vec<String>,
    /// Directory names that are never hidden. At the root, each entry is also
    /// tried as a relative path to pin that folder into the listing.
    pub allow_dirs: Vec<String>,
    /// File names that are never hidden.
    pub allow_files: Vec<String>,
}

/// Compiled ignore/allow lists.
#[derive(Debug, Clone)]
pub struct PatternSet {
    ignore_dirs: GlobSet,
    ignore_files: GlobSet,
    allow_dirs: GlobSet,
    allow_files: GlobSet,
    pinned_dirs: Vec<String>,
}

impl PatternSet {
    /// Compile all four lists.
    pub fn new(lists: &PatternLists) -> Result<Self, ExplorerError> {
        Ok(Self {
            ignore_dirs: build_set(&lists.ignore_dirs)?,
            ignore_files: build_set(&lists.ignore_files)?,
            allow_dirs: build_set(&lists.allow_dirs)?,
            allow_files: build_set(&lists.allow_files)?,
            pinned_dirs: lists.allow_dirs.clone(),
        })
    }

    /// A set that hides nothing.
    pub fn empty() -> Self {
        Self {
            ignore_dirs: GlobSet::empty(),
            ignore_files: GlobSet::empty(),
            allow_dirs: GlobSet::empty(),
            allow_files: GlobSet::empty(),
            pinned_dirs: Vec::new(),
        }
    }

    /// Decide whether an entry is hidden.
    ///
    /// The allow list for the entry's kind is consulted first and wins
    /// unconditionally; only then is the ignore list checked.
    pub fn should_ignore(&self, name: &str, is_directory: bool) -> bool {
        let (allow, ignore) = if is_directory {
            (&self.allow_dirs, &self.ignore_dirs)
        } else {
            (&self.allow_files, &self.ignore_files)
        };

        if allow.is_match(name) {
            return false;
        }
        ignore.is_match(name)
    }

    /// Allow-directory entries reinterpreted as root-relative folders.
    pub fn pinned_dirs(&self) -> &[String] {
        &self.pinned_dirs
    }
}
