//! Flat URL graph: root, parent, children and siblings.
//!
//! Relationships are purely URL-based. A file's parent URL is its URL with
//! a trailing slash and the last segment removed; its parent is whichever
//! file has exactly that URL. No intermediate files are synthesized, so a
//! file under a directory without an index has no parent.

use std::collections::HashMap;

use crate::record::{FileId, FileRecord, Links};
use crate::sort::SortPolicy;

/// Parent URL of `url` (`/foo/bar.html` and `/foo/bar/` both give `/foo/`).
///
/// Returns `None` for URLs without a `/` before their last segment.
pub(crate) fn parent_url(url: &str) -> Option<&str> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed.rfind('/').map(|i| &url[..=i])
}

/// Compute relationship pointers for every record.
///
/// `url_index` maps each record's URL to its id; `root_url` is the URL of
/// the site root. The result is indexed like `records`.
pub(crate) fn link(
    records: &[FileRecord],
    url_index: &HashMap<String, FileId>,
    root_url: &str,
    sort: &SortPolicy,
) -> Vec<Links> {
    let root = url_index.get(root_url).copied();

    // Group every non-root file under its parent URL, in input order
    let mut by_parent: HashMap<&str, Vec<FileId>> = HashMap::new();
    for record in records {
        if record.url() == root_url {
            continue;
        }
        if let Some(parent) = parent_url(record.url()) {
            by_parent.entry(parent).or_default().push(record.id);
        }
    }
    for group in by_parent.values_mut() {
        sort.sort_ids(group, records);
    }

    records
        .iter()
        .map(|record| {
            let parent = if record.url() == root_url {
                None
            } else {
                parent_url(record.url())
            };
            Links {
                root,
                parent: parent.and_then(|p| url_index.get(p).copied()),
                children: by_parent.get(record.url()).cloned().unwrap_or_default(),
                siblings: parent
                    .and_then(|p| by_parent.get(p))
                    .cloned()
                    .unwrap_or_default(),
            }
        })
        .collect()
}
