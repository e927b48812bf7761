//! Hierarchical section tree.
//!
//! Each directory index file becomes a section node. The node lists the
//! files whose section URL equals its URL and nests the sections of
//! deeper index files. The root node always exists: it takes the home
//! file's properties when there is one and stays empty otherwise.
//!
//! # Architecture
//!
//! Sections live in a flat `Vec<Section>` addressed by [`SectionId`], with
//! the root at index 0. Nodes refer to files by [`FileId`], so neither
//! direction of the file/section relationship holds a reference.
//!
//! An index file whose intermediate directories have no index of their own
//! attaches to its nearest existing ancestor section.

use std::collections::HashMap;

use serde::Serialize;
use ssg_storage::DataBag;

use crate::record::{FileId, FileRecord};
use crate::sort::SortPolicy;
use crate::url::BaseUrl;

/// Index of a section node in a [`SectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) usize);

/// A section node.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    url: String,
    parent: Option<SectionId>,
    sections: Vec<SectionId>,
    files: Vec<FileId>,
    properties: DataBag,
}

impl Section {
    fn new(name: String, url: String, parent: Option<SectionId>) -> Self {
        Self {
            name,
            url,
            parent,
            sections: Vec::new(),
            files: Vec::new(),
            properties: DataBag::new(),
        }
    }

    /// Last URL segment of the section (empty for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section URL, always ending in `/`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Enclosing section (`None` for the root).
    #[must_use]
    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    /// Nested sections in tree order.
    #[must_use]
    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    /// Member files in tree order; the index file comes first.
    #[must_use]
    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    /// Properties copied from the index file's data bag.
    #[must_use]
    pub fn properties(&self) -> &DataBag {
        &self.properties
    }

    /// Get a copied property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }
}

/// Serializable view of a section and its descendants.
///
/// Files are listed by URL; copied properties appear alongside the
/// structural fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionNode {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub properties: DataBag,
    pub files: Vec<String>,
    pub sections: Vec<SectionNode>,
}

/// Section tree with the root node at [`SectionTree::ROOT`].
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTree {
    sections: Vec<Section>,
}

impl SectionTree {
    /// Identifier of the root node.
    pub const ROOT: SectionId = SectionId(0);

    /// Tree holding only an empty root node.
    pub(crate) fn empty(base: &BaseUrl) -> Self {
        Self {
            sections: vec![Section::new(String::new(), base.root(), None)],
        }
    }

    /// Assemble the tree from finalized records.
    ///
    /// Returns the tree and, indexed like `records`, the section each file
    /// is listed in.
    pub(crate) fn build(
        records: &[FileRecord],
        base: &BaseUrl,
        sort: &SortPolicy,
        properties: &[String],
    ) -> (Self, Vec<Option<SectionId>>) {
        let mut order: Vec<&FileRecord> = records.iter().collect();
        order.sort_by(|a, b| sort.tree_order(a, b));

        // Members per section URL, already in tree order
        let mut members: HashMap<&str, Vec<FileId>> = HashMap::new();
        for record in order.iter().copied() {
            members
                .entry(record.section_url())
                .or_default()
                .push(record.id);
        }

        let mut tree = Self::empty(base);
        let mut by_url: HashMap<String, SectionId> = HashMap::new();
        by_url.insert(base.root(), Self::ROOT);

        for record in order.iter().filter(|r| r.is_index()) {
            let id = if record.is_home() {
                Self::ROOT
            } else {
                let Some(id) = tree.attach(record.url(), base, &by_url) else {
                    continue;
                };
                by_url.insert(record.url().to_owned(), id);
                id
            };

            let section = &mut tree.sections[id.0];
            section.files = members.remove(record.url()).unwrap_or_default();
            copy_properties(&mut section.properties, record.data(), properties);
        }

        let mut section_of = vec![None; records.len()];
        tree.assign(Self::ROOT, &mut section_of);

        tracing::debug!(sections = tree.len(), "Built section tree");
        (tree, section_of)
    }

    /// Create the node for an index URL under its nearest existing ancestor.
    fn attach(
        &mut self,
        url: &str,
        base: &BaseUrl,
        by_url: &HashMap<String, SectionId>,
    ) -> Option<SectionId> {
        if by_url.contains_key(url) {
            return None;
        }
        let rel = base.strip(url)?;
        let tokens: Vec<&str> = rel.split('/').filter(|t| !t.is_empty()).collect();
        let (name, ancestors) = tokens.split_last()?;

        let mut parent = Self::ROOT;
        let mut prefix = base.root();
        for token in ancestors {
            prefix.push_str(token);
            prefix.push('/');
            if let Some(&id) = by_url.get(&prefix) {
                parent = id;
            }
        }

        let id = SectionId(self.sections.len());
        self.sections
            .push(Section::new((*name).to_owned(), url.to_owned(), Some(parent)));
        self.sections[parent.0].sections.push(id);
        Some(id)
    }

    /// Record which section lists each file, walking from `id` down.
    fn assign(&self, id: SectionId, section_of: &mut [Option<SectionId>]) {
        let section = &self.sections[id.0];
        for file in &section.files {
            section_of[file.0] = Some(id);
        }
        for &child in &section.sections {
            self.assign(child, section_of);
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Section {
        &self.sections[Self::ROOT.0]
    }

    /// Get a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }

    /// Find a node by URL.
    #[must_use]
    pub fn find(&self, url: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.url == url)
    }

    /// Nested sections of a node.
    pub fn children(&self, id: SectionId) -> impl Iterator<Item = &Section> {
        self.sections[id.0]
            .sections
            .iter()
            .map(|&child| &self.sections[child.0])
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the tree has no nodes (never true once built).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Build the serializable view rooted at `id`.
    #[must_use]
    pub fn node(&self, id: SectionId, records: &[FileRecord]) -> SectionNode {
        let section = &self.sections[id.0];
        SectionNode {
            name: section.name.clone(),
            url: section.url.clone(),
            properties: section.properties.clone(),
            files: section
                .files
                .iter()
                .map(|f| records[f.0].url().to_owned())
                .collect(),
            sections: section
                .sections
                .iter()
                .map(|&child| self.node(child, records))
                .collect(),
        }
    }
}

/// Copy the named properties present in `data` onto a section.
fn copy_properties(target: &mut DataBag, data: &DataBag, names: &[String]) {
    for name in names {
        if let Some(value) = data.get(name) {
            target.insert(name.as_str(), value.clone());
        }
    }
}
