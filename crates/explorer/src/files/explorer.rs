//! The listing facade.
//!
//! [`FileExplorer`] owns the immutable configuration (canonical root, compiled
//! patterns, aliases and limits) and answers one listing request at a time.
//! It holds no mutable state, so a single instance can be shared across
//! threads behind an `Arc`.

use std::path::Path;

use protocol::messages::{Breadcrumb, ListingRequest, ListingResponse};
use tracing::{debug, info};

use super::breadcrumb;
use super::entry::{unreadable_placeholder, Aliases};
use super::error::ExplorerError;
use super::patterns::{PatternLists, PatternSet};
use super::pipeline::{self, ListingQuery, ListingResult, SortMode};
use super::resolver::ExplorerRoot;
use super::scanner::{DirectoryScanner, ScanOutcome};
use crate::config::Config;

/// Request bounds applied on top of client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLimits {
    /// Page size for requests that do not name one.
    pub default_page_size: usize,
    /// Largest page size a client may ask for.
    pub max_page_size: usize,
    /// Upper bound on children examined per directory (`0` = unbounded).
    pub max_entries: usize,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            default_page_size: protocol::DEFAULT_PAGE_SIZE as usize,
            max_page_size: 500,
            max_entries: 10_000,
        }
    }
}

/// A processed listing together with its breadcrumb.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Crumbs from the root to the listed folder.
    pub breadcrumb: Vec<Breadcrumb>,
    /// Folder that was listed, relative to the root.
    pub folder: String,
    /// The requested page.
    pub result: ListingResult,
}

impl Listing {
    /// Convert to the protocol response.
    ///
    /// An unreadable folder is reported as a single placeholder entry.
    pub fn to_response(&self) -> ListingResponse {
        let entries = if self.result.unreadable {
            vec![unreadable_placeholder(&self.folder)]
        } else {
            self.result.entries.iter().map(|e| e.to_view()).collect()
        };

        ListingResponse {
            breadcrumb: self.breadcrumb.clone(),
            entries,
            total_count: self.result.total_count as u64,
            page: self.result.page as u32,
            total_pages: self.result.total_pages as u32,
        }
    }
}

/// Read-only, root-confined directory explorer.
#[derive(Debug, Clone)]
pub struct FileExplorer {
    root: ExplorerRoot,
    patterns: PatternSet,
    aliases: Aliases,
    limits: ListingLimits,
}

impl FileExplorer {
    /// Create an explorer over `root` that hides nothing.
    pub fn new(root: &Path) -> Result<Self, ExplorerError> {
        Ok(Self {
            root: ExplorerRoot::new(root)?,
            patterns: PatternSet::empty(),
            aliases: Aliases::new(),
            limits: ListingLimits::default(),
        })
    }

    /// Build an explorer from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ExplorerError> {
        let root = config.effective_root();
        let explorer = Self::new(&root)?
            .with_patterns(&config.patterns)?
            .with_aliases(config.aliases.clone())
            .with_limits(ListingLimits {
                default_page_size: config.listing.default_page_size,
                max_page_size: config.listing.max_page_size,
                max_entries: config.listing.max_entries,
            });

        info!(
            root = ?explorer.root.path(),
            ignore_dirs = config.patterns.ignore_dirs.len(),
            ignore_files = config.patterns.ignore_files.len(),
            allow_dirs = config.patterns.allow_dirs.len(),
            allow_files = config.patterns.allow_files.len(),
            aliases = config.aliases.len(),
            "Explorer configured"
        );
        Ok(explorer)
    }

    /// Use the given ignore/allow lists.
    pub fn with_patterns(mut self, lists: &PatternLists) -> Result<Self, ExplorerError> {
        self.patterns = PatternSet::new(lists)?;
        Ok(self)
    }

    /// Use the given directory aliases.
    pub fn with_aliases(mut self, aliases: Aliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Use the given request bounds.
    pub fn with_limits(mut self, limits: ListingLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The containment boundary.
    pub fn root(&self) -> &ExplorerRoot {
        &self.root
    }

    /// Normalize client input into a query.
    pub fn query(&self, request: &ListingRequest) -> ListingQuery {
        let max_page_size = self.limits.max_page_size.max(1);
        let page_size = request
            .page_size
            .map_or(self.limits.default_page_size, |size| size as usize);

        ListingQuery {
            filter: request.filter.clone(),
            sort: SortMode::parse_or_default(&request.sort),
            page: (request.page as usize).max(1),
            page_size: page_size.clamp(1, max_page_size),
        }
    }

    /// Answer one listing request.
    ///
    /// Fails only with [`ExplorerError::PathRejected`]; unreadable folders and
    /// unresolvable children are part of a successful listing.
    pub fn list(&self, request: &ListingRequest) -> Result<Listing, ExplorerError> {
        let dir = self.root.resolve(&request.folder)?;
        let query = self.query(request);
        debug!(
            folder = %request.folder,
            filter = %query.filter,
            sort = %query.sort,
            page = query.page,
            page_size = query.page_size,
            "Listing directory"
        );

        let scanner = DirectoryScanner::new(&self.root, &self.patterns, &self.aliases)
            .max_entries(self.limits.max_entries);

        let result = match scanner.scan(&dir) {
            ScanOutcome::Entries(entries) => pipeline::process(entries, &query),
            ScanOutcome::Unreadable => ListingResult::unreadable(),
        };

        Ok(Listing {
            breadcrumb: breadcrumb::build(&self.root, &dir),
            folder: self.root.relative_path(&dir).unwrap_or_default(),
            result,
        })
    }
}
