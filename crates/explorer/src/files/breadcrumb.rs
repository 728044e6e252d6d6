//! Breadcrumb derivation.

use std::path::Path;

use protocol::messages::Breadcrumb;

use super::resolver::ExplorerRoot;

/// Build the crumbs from the root down to `current`.
///
/// The first crumb is always `Home`. A path outside the root yields only
/// that crumb.
pub fn build(root: &ExplorerRoot, current: &Path) -> Vec<Breadcrumb> {
    let relative = root.relative_path(current).unwrap_or_default();
    from_relative(&relative)
}

/// Build crumbs from a `/`-separated relative folder.
pub fn from_relative(relative: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb::home()];

    let mut folder = String::new();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        if !folder.is_empty() {
            folder.push('/');
        }
        folder.push_str(segment);
        crumbs.push(Breadcrumb {
            label: segment.to_string(),
            folder: folder.clone(),
        });
    }

    crumbs
}
