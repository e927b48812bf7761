//! Finished site graph.
//!
//! [`Site`] owns every [`FileRecord`] in input order together with the
//! [`SectionTree`]. It is immutable: all relationship pointers were fixed
//! at finalization.
//!
//! # Architecture
//!
//! Records are stored in a flat `Vec<FileRecord>` with relationships held
//! as [`FileId`] indices. This provides:
//! - O(1) URL and source path lookups via `HashMap` indices
//! - O(d) breadcrumb building where d is the file depth

use std::collections::HashMap;
use std::fmt;

use ssg_storage::SourceFile;

use crate::record::{FileId, FileRecord};
use crate::section::{Section, SectionNode, SectionTree};
use crate::url::BaseUrl;

/// Two files resolved to the same URL and the later one was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateWarning {
    /// The contested URL.
    pub url: String,
    /// Path of the file that was dropped.
    pub replaced: String,
    /// Path of the file that took its place.
    pub path: String,
}

impl fmt::Display for DuplicateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {} both resolve to {}; keeping {}",
            self.replaced, self.path, self.url, self.path
        )
    }
}

/// Site graph with efficient lookups.
#[derive(Debug, Clone)]
pub struct Site {
    base: BaseUrl,
    records: Vec<FileRecord>,
    url_index: HashMap<String, FileId>,
    path_index: HashMap<String, FileId>,
    sections: SectionTree,
    warnings: Vec<DuplicateWarning>,
}

impl Site {
    pub(crate) fn new(
        base: BaseUrl,
        records: Vec<FileRecord>,
        url_index: HashMap<String, FileId>,
        sections: SectionTree,
        warnings: Vec<DuplicateWarning>,
    ) -> Self {
        let path_index = records
            .iter()
            .map(|record| (record.derived.path.clone(), record.id))
            .collect();

        Self {
            base,
            records,
            url_index,
            path_index,
            sections,
            warnings,
        }
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the site has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Files in input order.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Get a file by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this site.
    #[must_use]
    pub fn file(&self, id: FileId) -> &FileRecord {
        &self.records[id.0]
    }

    /// Get a file by URL.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&FileRecord> {
        self.url_index.get(url).map(|id| &self.records[id.0])
    }

    /// Get a file by relative path (`\` separators are accepted).
    #[must_use]
    pub fn get_by_path(&self, path: &str) -> Option<&FileRecord> {
        let path = crate::url::normalize_path(path).ok()?;
        self.path_index.get(&path).map(|id| &self.records[id.0])
    }

    /// The home file, if one exists.
    #[must_use]
    pub fn root(&self) -> Option<&FileRecord> {
        self.url_index
            .get(&self.base.root())
            .map(|id| &self.records[id.0])
    }

    /// Parent of a file.
    #[must_use]
    pub fn parent(&self, id: FileId) -> Option<&FileRecord> {
        self.records[id.0].parent().map(|p| &self.records[p.0])
    }

    /// Children of a file in sort order.
    #[must_use]
    pub fn children(&self, id: FileId) -> Vec<&FileRecord> {
        self.resolve(self.records[id.0].children())
    }

    /// Siblings of a file in sort order, the file itself included.
    #[must_use]
    pub fn siblings(&self, id: FileId) -> Vec<&FileRecord> {
        self.resolve(self.records[id.0].siblings())
    }

    /// Section a file is listed in.
    #[must_use]
    pub fn section_of(&self, id: FileId) -> Option<&Section> {
        self.records[id.0].section().map(|s| self.sections.get(s))
    }

    /// Files of a section in tree order.
    #[must_use]
    pub fn section_files(&self, section: &Section) -> Vec<&FileRecord> {
        self.resolve(section.files())
    }

    /// Ancestors of a file, from the home file down to its parent.
    ///
    /// The chain stops at the first missing parent.
    #[must_use]
    pub fn breadcrumbs(&self, id: FileId) -> Vec<&FileRecord> {
        let mut crumbs = Vec::new();
        let mut current = self.records[id.0].parent();
        while let Some(parent) = current {
            let record = &self.records[parent.0];
            crumbs.push(record);
            current = record.parent();
        }
        crumbs.reverse();
        crumbs
    }

    /// The section tree.
    #[must_use]
    pub fn sections(&self) -> &SectionTree {
        &self.sections
    }

    /// Serializable view of the whole section tree.
    #[must_use]
    pub fn section_tree(&self) -> SectionNode {
        self.sections.node(SectionTree::ROOT, &self.records)
    }

    /// Duplicate URLs resolved during the build.
    #[must_use]
    pub fn warnings(&self) -> &[DuplicateWarning] {
        &self.warnings
    }

    /// Consume the site, returning files in input order with enriched data bags.
    #[must_use]
    pub fn into_files(self) -> Vec<SourceFile> {
        self.records.into_iter().map(FileRecord::into_file).collect()
    }

    fn resolve(&self, ids: &[FileId]) -> Vec<&FileRecord> {
        ids.iter().map(|id| &self.records[id.0]).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use ssg_config::SiteConfig;

    use super::*;
    use crate::SiteBuilder;

    static_assertions::assert_impl_all!(Site: Send, Sync);

    fn build(paths: &[&str]) -> Site {
        let mut builder = SiteBuilder::new(SiteConfig::default()).unwrap();
        for path in paths {
            builder.accumulate(SourceFile::new(*path, "")).unwrap();
        }
        builder.finalize().unwrap()
    }

    fn urls(records: &[&FileRecord]) -> Vec<String> {
        records.iter().map(|r| r.url().to_owned()).collect()
    }

    #[test]
    fn test_get_by_url_and_path() {
        let site = build(&["index.html", "foo/bar.html"]);

        assert_eq!(site.get("/foo/bar.html").unwrap().path(), "foo/bar.html");
        assert_eq!(site.get_by_path("foo/bar.html").unwrap().url(), "/foo/bar.html");
        assert_eq!(site.get_by_path("foo\\bar.html").unwrap().url(), "/foo/bar.html");
        assert!(site.get("/missing.html").is_none());
        assert!(site.get_by_path("../x").is_none());
    }

    #[test]
    fn test_breadcrumbs() {
        let site = build(&[
            "index.html",
            "foo/index.html",
            "foo/bar/index.html",
            "foo/bar/baz.html",
        ]);
        let baz = site.get("/foo/bar/baz.html").unwrap().id();

        assert_eq!(urls(&site.breadcrumbs(baz)), vec!["/", "/foo/", "/foo/bar/"]);
        assert!(site.breadcrumbs(site.root().unwrap().id()).is_empty());
    }

    #[test]
    fn test_breadcrumbs_stop_at_missing_parent() {
        let site = build(&["index.html", "foo/bar/index.html", "foo/bar/baz.html"]);
        let baz = site.get("/foo/bar/baz.html").unwrap().id();

        assert_eq!(urls(&site.breadcrumbs(baz)), vec!["/foo/bar/"]);
    }

    #[test]
    fn test_section_files_and_section_of() {
        let site = build(&["index.html", "foo/index.html", "foo/bar.html"]);
        let bar = site.get("/foo/bar.html").unwrap().id();

        let section = site.section_of(bar).unwrap();

        assert_eq!(section.url(), "/foo/");
        assert_eq!(
            urls(&site.section_files(section)),
            vec!["/foo/", "/foo/bar.html"]
        );
    }

    #[test]
    fn test_into_files_keeps_input_order() {
        let site = build(&["foo/bar.html", "index.html"]);

        let files = site.into_files();

        assert_eq!(files[0].path, "foo/bar.html");
        assert_eq!(files[1].path, "index.html");
        assert_eq!(files[0].data.get("url"), Some(&json!("/foo/bar.html")));
    }

    #[test]
    fn test_duplicate_warning_display() {
        let warning = DuplicateWarning {
            url: "/foo/".to_owned(),
            replaced: "foo.html".to_owned(),
            path: "foo/index.html".to_owned(),
        };

        assert_eq!(
            warning.to_string(),
            "foo.html and foo/index.html both resolve to /foo/; keeping foo/index.html"
        );
    }
}
