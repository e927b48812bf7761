//! Per-file record held by the site graph.
//!
//! A [`FileRecord`] wraps a [`SourceFile`] together with its derived URLs
//! and, once the graph is finalized, the [`FileId`] pointers to related
//! files. Pointers are indices into the site's flat record list, so the
//! graph has no reference cycles.

use serde_json::Value;
use ssg_storage::{Contents, DataBag, SourceFile};

use crate::section::SectionId;
use crate::url::DerivedUrl;

/// Data bag keys written by the site builder.
///
/// Every key is written with insert-if-absent semantics: a value already
/// present in the bag (including JSON `null`) is never overwritten.
pub mod keys {
    /// Canonical URL.
    pub const URL: &str = "url";
    /// URL keeping the original filename.
    pub const DIRTY_URL: &str = "dirtyUrl";
    /// Whether the file is a directory index.
    pub const IS_INDEX: &str = "isIndex";
    /// Whether the file is the site home.
    pub const IS_HOME: &str = "isHome";
    /// URL of the file's section.
    pub const SECTION_URL: &str = "sectionUrl";
    /// URL of the home file, or `null`.
    pub const ROOT: &str = "root";
    /// URL of the parent file, or `null`.
    pub const PARENT: &str = "parent";
    /// URLs of the child files.
    pub const CHILDREN: &str = "children";
    /// URLs of the sibling files, self included.
    pub const SIBLINGS: &str = "siblings";
    /// URL of the owning section node, or `null`.
    pub const SECTION: &str = "section";
}

/// Index of a file in the site graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

impl FileId {
    /// Position of the file in input order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Relationship pointers computed at finalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Links {
    pub root: Option<FileId>,
    pub parent: Option<FileId>,
    pub children: Vec<FileId>,
    pub siblings: Vec<FileId>,
}

/// A file in the site graph.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub(crate) id: FileId,
    pub(crate) file: SourceFile,
    pub(crate) derived: DerivedUrl,
    pub(crate) depth: usize,
    pub(crate) sort_key: Value,
    pub(crate) links: Links,
    pub(crate) section: Option<SectionId>,
}

impl FileRecord {
    pub(crate) fn new(id: FileId, mut file: SourceFile, derived: DerivedUrl, depth: usize) -> Self {
        let data = &mut file.data;
        data.insert_if_absent(keys::URL, derived.url.clone());
        data.insert_if_absent(keys::DIRTY_URL, derived.dirty_url.clone());
        data.insert_if_absent(keys::IS_INDEX, derived.is_index);
        data.insert_if_absent(keys::IS_HOME, derived.is_home);
        data.insert_if_absent(keys::SECTION_URL, derived.section_url.clone());

        Self {
            id,
            file,
            derived,
            depth,
            sort_key: Value::Null,
            links: Links::default(),
            section: None,
        }
    }

    /// Identifier of this file.
    #[must_use]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Relative path as supplied.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.file.path
    }

    /// Canonical URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.derived.url
    }

    /// URL keeping the original filename.
    #[must_use]
    pub fn dirty_url(&self) -> &str {
        &self.derived.dirty_url
    }

    /// URL of the section this file belongs to.
    #[must_use]
    pub fn section_url(&self) -> &str {
        &self.derived.section_url
    }

    /// Whether the file is a directory index.
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.derived.is_index
    }

    /// Whether the file is the index at the site root.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.derived.is_home
    }

    /// Number of URL segments below the site root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Value the file is ordered by (`null` when missing or sorting is off).
    #[must_use]
    pub fn sort_key(&self) -> &Value {
        &self.sort_key
    }

    /// File content.
    #[must_use]
    pub fn contents(&self) -> &Contents {
        &self.file.contents
    }

    /// Data bag, including keys written by the builder.
    #[must_use]
    pub fn data(&self) -> &DataBag {
        &self.file.data
    }

    /// The home file, if one exists.
    #[must_use]
    pub fn root(&self) -> Option<FileId> {
        self.links.root
    }

    /// The file whose URL is this file's parent URL, if one exists.
    #[must_use]
    pub fn parent(&self) -> Option<FileId> {
        self.links.parent
    }

    /// Files whose parent URL is this file's URL, in sort order.
    #[must_use]
    pub fn children(&self) -> &[FileId] {
        &self.links.children
    }

    /// Files sharing this file's parent URL, self included, in sort order.
    #[must_use]
    pub fn siblings(&self) -> &[FileId] {
        &self.links.siblings
    }

    /// Section node this file is listed in, if any.
    #[must_use]
    pub fn section(&self) -> Option<SectionId> {
        self.section
    }

    /// Consume the record, returning the file with its enriched data bag.
    #[must_use]
    pub fn into_file(self) -> SourceFile {
        self.file
    }
}
