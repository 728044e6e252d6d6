//! Safe, read-only directory listing.
//!
//! This module provides the listing pipeline:
//! - Root containment for client supplied folders
//! - Ignore/allow wildcard patterns and directory aliases
//! - Single-level scanning with pinned root folders
//! - Filtering, sorting and pagination
//! - Breadcrumbs from the root to the listed folder
//!
//! # Security
//!
//! Every folder is canonicalized and must be the root or lie below it,
//! compared component by component. Children that resolve outside the root
//! (for example through a symlink) are never listed.

pub mod breadcrumb;
pub mod entry;
pub mod error;
pub mod explorer;
pub mod patterns;
pub mod pipeline;
pub mod resolver;
pub mod scanner;

pub use entry::{Aliases, Entry};
pub use error::ExplorerError;
pub use explorer::{FileExplorer, Listing, ListingLimits};
pub use patterns::{PatternLists, PatternSet, WildcardPattern};
pub use pipeline::{ListingQuery, ListingResult, SortMode};
pub use resolver::ExplorerRoot;
pub use scanner::{DirectoryScanner, ScanOutcome};
