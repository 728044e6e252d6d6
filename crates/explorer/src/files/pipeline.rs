//! Filtering, sorting and pagination of scanned entries.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entry::Entry;
use super::patterns::WildcardPattern;

/// Sort modes understood by the listing.
///
/// Directories always precede files; the mode orders entries within each
/// group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    /// Display name, A to Z.
    #[default]
    NameAsc,
    /// Display name, Z to A.
    NameDesc,
    /// Extension, A to Z.
    ExtAsc,
    /// Extension, Z to A.
    ExtDesc,
    /// Oldest first.
    DateAsc,
    /// Newest first.
    DateDesc,
}

/// Error returned when parsing an unknown sort mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode: {0}")]
pub struct UnknownSortMode(pub String);

impl SortMode {
    /// All modes, in their wire order.
    pub const ALL: [SortMode; 6] = [
        SortMode::NameAsc,
        SortMode::NameDesc,
        SortMode::ExtAsc,
        SortMode::ExtDesc,
        SortMode::DateAsc,
        SortMode::DateDesc,
    ];

    /// Parse a mode name, falling back to [`SortMode::NameAsc`].
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::NameAsc => "nameAsc",
            SortMode::NameDesc => "nameDesc",
            SortMode::ExtAsc => "extAsc",
            SortMode::ExtDesc => "extDesc",
            SortMode::DateAsc => "dateAsc",
            SortMode::DateDesc => "dateDesc",
        }
    }
}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownSortMode(s.to_string()))
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-mode ordering key, computed once per entry.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ModeKey {
    Text(String),
    Time(SystemTime),
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Directed {
    Asc(ModeKey),
    Desc(Reverse<ModeKey>),
}

/// Full ordering key: directories first, then the mode, then names.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    is_file: bool,
    mode: Directed,
    display_name: String,
    name: String,
}

impl SortKey {
    fn new(entry: &Entry, mode: SortMode) -> Self {
        let display_name = entry.display_name.to_lowercase();
        let text = |s: &str| ModeKey::Text(s.to_lowercase());
        let time = || ModeKey::Time(entry.modified_at().unwrap_or(UNIX_EPOCH));

        let mode = match mode {
            SortMode::NameAsc => Directed::Asc(ModeKey::Text(display_name.clone())),
            SortMode::NameDesc => Directed::Desc(Reverse(ModeKey::Text(display_name.clone()))),
            SortMode::ExtAsc => Directed::Asc(text(entry.extension())),
            SortMode::ExtDesc => Directed::Desc(Reverse(text(entry.extension()))),
            SortMode::DateAsc => Directed::Asc(time()),
            SortMode::DateDesc => Directed::Desc(Reverse(time())),
        };

        Self {
            is_file: !entry.is_directory,
            mode,
            display_name,
            name: entry.name.clone(),
        }
    }
}

/// Sort entries in place: directories first, then `mode`, then by name.
///
/// The trailing name comparison only breaks ties so that pages stay stable
/// across requests. Keys are computed once per entry, so modification times
/// are only read for date modes.
pub fn sort_entries(entries: &mut [Entry], mode: SortMode) {
    entries.sort_by_cached_key(|entry| SortKey::new(entry, mode));
}

/// Keep entries whose on-disk name matches `filter`. Empty keeps all.
pub fn filter_entries(entries: Vec<Entry>, filter: &str) -> Vec<Entry> {
    if filter.is_empty() {
        return entries;
    }

    match WildcardPattern::filter(filter) {
        Ok(pattern) => entries
            .into_iter()
            .filter(|e| pattern.is_match(&e.name))
            .collect(),
        Err(e) => {
            warn!(filter, error = %e, "Filter could not be compiled, nothing matches");
            Vec::new()
        }
    }
}

/// Number of pages needed for `total` entries, never less than one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// Pagination and filter parameters of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Wildcard filter on names.
    pub filter: String,
    /// Sort mode.
    pub sort: SortMode,
    /// Requested 1-based page.
    pub page: usize,
    /// Entries per page.
    pub page_size: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: SortMode::NameAsc,
            page: 1,
            page_size: protocol::DEFAULT_PAGE_SIZE as usize,
        }
    }
}

/// One page of a processed listing.
#[derive(Debug, Clone)]
pub struct ListingResult {
    /// Entries on the page, at most `page_size`.
    pub entries: Vec<Entry>,
    /// Entries after filtering, before pagination.
    pub total_count: usize,
    /// Page returned, clamped to `1..=total_pages`.
    pub page: usize,
    /// Pages at the requested page size.
    pub total_pages: usize,
    /// The folder could not be opened.
    pub unreadable: bool,
}

impl ListingResult {
    /// Result for a folder that could not be opened.
    pub fn unreadable() -> Self {
        Self {
            entries: Vec::new(),
            total_count: 0,
            page: 1,
            total_pages: 1,
            unreadable: true,
        }
    }
}

/// Filter, count, sort and paginate scanned entries.
pub fn process(entries: Vec<Entry>, query: &ListingQuery) -> ListingResult {
    let mut filtered = filter_entries(entries, &query.filter);
    let total_count = filtered.len();

    sort_entries(&mut filtered, query.sort);

    let page_size = query.page_size.max(1);
    let total_pages = total_pages(total_count, page_size);
    let page = query.page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let entries = filtered.into_iter().skip(start).take(page_size).collect();

    ListingResult {
        entries,
        total_count,
        page,
        total_pages,
        unreadable: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn file(name: &str, modified: u64) -> Entry {
        Entry::file(name.to_string(), PathBuf::from(name), name.to_string()).with_modified(at(modified))
    }

    fn dir(name: &str, display: &str, modified: u64) -> Entry {
        Entry::directory(
            name.to_string(),
            display.to_string(),
            false,
            PathBuf::from(name),
            name.to_string(),
        )
        .with_modified(at(modified))
    }

    fn sample() -> Vec<Entry> {
        vec![
            file("zeta.TXT", 300),
            dir("beta", "beta", 50),
            file("Alpha.md", 100),
            file("readme", 200),
            dir("Alpha", "alpha", 400),
            file("data.csv", 10),
        ]
    }

    fn query(filter: &str, sort: SortMode, page: usize, page_size: usize) -> ListingQuery {
        ListingQuery {
            filter: filter.to_string(),
            sort,
            page,
            page_size,
        }
    }

    fn names(result: &ListingResult) -> Vec<&str> {
        result.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("nameDesc".parse::<SortMode>().unwrap(), SortMode::NameDesc);
        assert_eq!("dateAsc".parse::<SortMode>().unwrap(), SortMode::DateAsc);
        assert!("NAMEASC".parse::<SortMode>().is_err());
        assert_eq!(SortMode::parse_or_default("bogus"), SortMode::NameAsc);
        assert_eq!(SortMode::parse_or_default(""), SortMode::NameAsc);

        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_name_asc() {
        let result = process(sample(), &query("", SortMode::NameAsc, 1, 20));
        assert_eq!(
            names(&result),
            vec!["Alpha", "beta", "Alpha.md", "data.csv", "readme", "zeta.TXT"]
        );
    }

    #[test]
    fn test_name_desc() {
        let result = process(sample(), &query("", SortMode::NameDesc, 1, 20));
        assert_eq!(
            names(&result),
            vec!["beta", "Alpha", "zeta.TXT", "readme", "data.csv", "Alpha.md"]
        );
    }

    #[test]
    fn test_name_sort_uses_display_name() {
        let entries = vec![dir("aaa", "Zebra", 0), dir("zzz", "Apple", 0)];
        let result = process(entries, &query("", SortMode::NameAsc, 1, 20));
        assert_eq!(names(&result), vec!["zzz", "aaa"]);
    }

    #[test]
    fn test_ext_asc() {
        let result = process(sample(), &query("", SortMode::ExtAsc, 1, 20));
        // "readme" has no extension and sorts first among files.
        assert_eq!(
            names(&result),
            vec!["Alpha", "beta", "readme", "data.csv", "Alpha.md", "zeta.TXT"]
        );
    }

    #[test]
    fn test_ext_desc() {
        let result = process(sample(), &query("", SortMode::ExtDesc, 1, 20));
        assert_eq!(
            names(&result),
            vec!["Alpha", "beta", "zeta.TXT", "Alpha.md", "data.csv", "readme"]
        );
    }

    #[test]
    fn test_date_asc() {
        let result = process(sample(), &query("", SortMode::DateAsc, 1, 20));
        assert_eq!(
            names(&result),
            vec!["beta", "Alpha", "data.csv", "Alpha.md", "readme", "zeta.TXT"]
        );
    }

    #[test]
    fn test_date_desc() {
        let result = process(sample(), &query("", SortMode::DateDesc, 1, 20));
        assert_eq!(
            names(&result),
            vec!["Alpha", "beta", "zeta.TXT", "readme", "Alpha.md", "data.csv"]
        );
    }

    #[test]
    fn test_directories_first_for_every_mode() {
        for mode in SortMode::ALL {
            let result = process(sample(), &query("", mode, 1, 20));
            let first_file = result
                .entries
                .iter()
                .position(|e| !e.is_directory)
                .unwrap();
            assert!(
                result.entries[first_file..].iter().all(|e| !e.is_directory),
                "directory after file for {}",
                mode
            );
        }
    }

    #[test]
    fn test_ties_break_on_name_for_every_mode() {
        let mut entries = Vec::new();
        for i in 0..60 {
            let ext = ["TXT", "txt", "md", ""][i % 4];
            let name = if ext.is_empty() {
                format!("Item{:02}", i % 15)
            } else {
                format!("item{:02}.{}", i % 15, ext)
            };
            entries.push(file(&name, (i % 3) as u64));
        }
        entries.push(dir("Zed", "zed", 0));
        entries.push(dir("zed", "zed", 0));

        for mode in SortMode::ALL {
            let mut sorted = entries.clone();
            sort_entries(&mut sorted, mode);

            assert_eq!(sorted[0].name, "Zed", "mode {}", mode);
            assert_eq!(sorted[1].name, "zed", "mode {}", mode);

            for pair in sorted[2..].windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let primary = match mode {
                    SortMode::NameAsc => a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()),
                    SortMode::NameDesc => b.display_name.to_lowercase().cmp(&a.display_name.to_lowercase()),
                    SortMode::ExtAsc => a.extension().to_lowercase().cmp(&b.extension().to_lowercase()),
                    SortMode::ExtDesc => b.extension().to_lowercase().cmp(&a.extension().to_lowercase()),
                    SortMode::DateAsc => a.modified_at().cmp(&b.modified_at()),
                    SortMode::DateDesc => b.modified_at().cmp(&a.modified_at()),
                };
                let ordering = primary
                    .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
                    .then_with(|| a.name.cmp(&b.name));
                assert_ne!(
                    ordering,
                    std::cmp::Ordering::Greater,
                    "{} before {} for {}",
                    a.name,
                    b.name,
                    mode
                );
            }
        }
    }

    #[test]
    fn test_filter_substring() {
        let entries = vec![
            file("app.log", 0),
            file("LOGFILE", 0),
            file("backlog", 0),
            file("readme.md", 0),
        ];
        let result = process(entries, &query("log", SortMode::NameAsc, 1, 20));
        assert_eq!(result.total_count, 3);
        assert_eq!(names(&result), vec!["app.log", "backlog", "LOGFILE"]);
    }

    #[test]
    fn test_filter_wildcard_on_name_not_alias() {
        let entries = vec![dir("tmp", "Temporary", 0), file("notes.txt", 0)];

        let result = process(entries.clone(), &query("temp*", SortMode::NameAsc, 1, 20));
        assert_eq!(result.total_count, 0);

        let result = process(entries, &query("t*", SortMode::NameAsc, 1, 20));
        assert_eq!(names(&result), vec!["tmp"]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(5, 0), 5);
    }

    fn many(count: usize) -> Vec<Entry> {
        (0..count)
            .map(|i| file(&format!("file{:03}.txt", i), i as u64))
            .collect()
    }

    #[test]
    fn test_pagination_clamps_page() {
        let result = process(many(45), &query("", SortMode::NameAsc, 5, 20));
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.page, 3);
        assert_eq!(result.entries.len(), 5);
        assert_eq!(result.entries[0].name, "file040.txt");

        let result = process(many(45), &query("", SortMode::NameAsc, 0, 20));
        assert_eq!(result.page, 1);
        assert_eq!(result.entries.len(), 20);
    }

    #[test]
    fn test_total_count_independent_of_page_size() {
        for page_size in [1, 7, 20, 100] {
            let result = process(many(45), &query("file0", SortMode::NameAsc, 2, page_size));
            assert_eq!(result.total_count, 45);
            assert!(result.entries.len() <= page_size);
        }
    }

    #[test]
    fn test_pages_concatenate_to_full_listing() {
        let page_size = 7;
        let full = process(many(45), &query("", SortMode::DateDesc, 1, 1000));
        let expected: Vec<String> = full.entries.iter().map(|e| e.name.clone()).collect();

        let first = process(many(45), &query("", SortMode::DateDesc, 1, page_size));
        let mut collected = Vec::new();
        for page in 1..=first.total_pages {
            let result = process(many(45), &query("", SortMode::DateDesc, page, page_size));
            collected.extend(result.entries.iter().map(|e| e.name.clone()));
        }

        assert_eq!(collected, expected);
    }

    #[test]
    fn test_empty_input() {
        let result = process(Vec::new(), &query("", SortMode::NameAsc, 3, 20));
        assert_eq!(result.total_count, 0);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.page, 1);
        assert!(result.entries.is_empty());
        assert!(!result.unreadable);
    }

    #[test]
    fn test_unreadable_result() {
        let result = ListingResult::unreadable();
        assert!(result.unreadable);
        assert_eq!(result.total_count, 0);
        assert_eq!(result.page, 1);
        assert_eq!(result.total_pages, 1);
    }
}
