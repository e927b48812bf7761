//! Two-phase site graph builder.
//!
//! Files are fed one at a time with [`SiteBuilder::accumulate`], which
//! derives URLs and buffers them in arrival order. [`SiteBuilder::finalize`]
//! then computes relationships and the section tree in a single pass over
//! the complete set and returns the finished [`Site`].

use std::collections::HashMap;

use serde_json::Value;
use ssg_config::{DuplicatePolicy, SiteConfig};
use ssg_storage::SourceFile;

use crate::error::SiteError;
use crate::graph;
use crate::record::{FileId, FileRecord, keys};
use crate::section::SectionTree;
use crate::site::{DuplicateWarning, Site};
use crate::sort::SortPolicy;
use crate::url::UrlDeriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    Open,
    Finalized,
}

/// Accumulates files and produces a [`Site`].
///
/// # Example
///
/// ```ignore
/// use ssg_config::SiteConfig;
/// use ssg_site::SiteBuilder;
/// use ssg_storage::SourceFile;
///
/// let mut builder = SiteBuilder::new(SiteConfig::default())?;
/// builder.accumulate(SourceFile::new("index.html", "home"))?;
/// builder.accumulate(SourceFile::new("foo/bar.html", "bar"))?;
/// let site = builder.finalize()?;
/// ```
#[derive(Debug)]
pub struct SiteBuilder {
    config: SiteConfig,
    deriver: UrlDeriver,
    sort: SortPolicy,
    state: BuildState,
    records: Vec<FileRecord>,
    url_index: HashMap<String, FileId>,
    rejected: Vec<String>,
    warnings: Vec<DuplicateWarning>,
}

impl SiteBuilder {
    /// Create a builder after validating its options.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Config`] if the options are invalid.
    pub fn new(config: SiteConfig) -> Result<Self, SiteError> {
        config.validate()?;

        Ok(Self {
            deriver: UrlDeriver::new(&config),
            sort: SortPolicy::new(config.sort.clone()),
            config,
            state: BuildState::Open,
            records: Vec::new(),
            url_index: HashMap::new(),
            rejected: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// Number of files buffered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no files have been buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Buffer one file.
    ///
    /// Files without content are skipped. Derived URL keys are written to
    /// the file's data bag unless already present.
    ///
    /// # Errors
    ///
    /// - [`SiteError::Finalized`] if called after [`finalize`](Self::finalize)
    /// - [`SiteError::UnsupportedInput`] for streamed content; the build
    ///   can no longer be finalized
    /// - [`SiteError::InvalidPath`] if the path cannot be mapped to a URL;
    ///   only this file is rejected
    /// - [`SiteError::DuplicateUrl`] under the `error` duplicate policy
    pub fn accumulate(&mut self, file: SourceFile) -> Result<(), SiteError> {
        if self.state == BuildState::Finalized {
            return Err(SiteError::Finalized);
        }
        if file.is_null() {
            tracing::trace!(path = %file.path, "Skipping file without content");
            return Ok(());
        }
        if file.is_stream() {
            tracing::error!(path = %file.path, "Streaming not supported");
            self.rejected.push(file.path.clone());
            return Err(SiteError::UnsupportedInput { path: file.path });
        }

        let derived = self
            .deriver
            .derive(&file.path)
            .map_err(|reason| SiteError::InvalidPath {
                path: file.path.clone(),
                reason,
            })?;

        if let Some(&existing) = self.url_index.get(&derived.url) {
            let existing_path = self.records[existing.0].path().to_owned();
            match self.config.duplicate_urls {
                DuplicatePolicy::Error => {
                    return Err(SiteError::DuplicateUrl {
                        url: derived.url,
                        existing: existing_path,
                        path: file.path,
                    });
                }
                DuplicatePolicy::Warn => {
                    let warning = DuplicateWarning {
                        url: derived.url.clone(),
                        replaced: existing_path,
                        path: file.path.clone(),
                    };
                    tracing::warn!(
                        url = %warning.url,
                        replaced = %warning.replaced,
                        path = %warning.path,
                        "Duplicate URL, keeping the later file"
                    );
                    self.warnings.push(warning);
                    let depth = self.deriver.base().depth(&derived.url);
                    self.records[existing.0] = FileRecord::new(existing, file, derived, depth);
                    return Ok(());
                }
            }
        }

        let id = FileId(self.records.len());
        let depth = self.deriver.base().depth(&derived.url);
        tracing::debug!(path = %file.path, url = %derived.url, "Buffered file");
        self.url_index.insert(derived.url.clone(), id);
        self.records.push(FileRecord::new(id, file, derived, depth));
        Ok(())
    }

    /// Compute relationships and the section tree.
    ///
    /// Runs once; the builder accepts no further calls afterwards. Pointer
    /// keys (`root`, `parent`, `children`, `siblings`, `section`) are written
    /// to each data bag as URLs unless already present.
    ///
    /// # Errors
    ///
    /// - [`SiteError::Finalized`] if called twice
    /// - [`SiteError::Aborted`] if any streamed file was rejected
    pub fn finalize(&mut self) -> Result<Site, SiteError> {
        if self.state == BuildState::Finalized {
            return Err(SiteError::Finalized);
        }
        self.state = BuildState::Finalized;

        if !self.rejected.is_empty() {
            return Err(SiteError::Aborted {
                paths: std::mem::take(&mut self.rejected),
            });
        }

        let base = self.deriver.base().clone();
        let mut records = std::mem::take(&mut self.records);
        let url_index = std::mem::take(&mut self.url_index);
        let warnings = std::mem::take(&mut self.warnings);

        for record in &mut records {
            record.sort_key = self.sort.sort_key(record.data());
        }

        let links = graph::link(&records, &url_index, &base.root(), &self.sort);
        let (sections, section_of) =
            SectionTree::build(&records, &base, &self.sort, &self.config.section_properties);

        let pointers: Vec<[(&str, Value); 5]> = links
            .iter()
            .zip(&section_of)
            .map(|(link, section)| {
                let url_of = |id: Option<FileId>| {
                    id.map_or(Value::Null, |id| Value::from(records[id.0].url()))
                };
                let urls_of = |ids: &[FileId]| {
                    Value::from(
                        ids.iter()
                            .map(|id| records[id.0].url().to_owned())
                            .collect::<Vec<_>>(),
                    )
                };
                [
                    (keys::ROOT, url_of(link.root)),
                    (keys::PARENT, url_of(link.parent)),
                    (keys::CHILDREN, urls_of(link.children.as_slice())),
                    (keys::SIBLINGS, urls_of(link.siblings.as_slice())),
                    (
                        keys::SECTION,
                        section.map_or(Value::Null, |id| Value::from(sections.get(id).url())),
                    ),
                ]
            })
            .collect();

        for (((record, link), section), pointers) in
            records.iter_mut().zip(links).zip(section_of).zip(pointers)
        {
            record.links = link;
            record.section = section;
            for (key, value) in pointers {
                record.file.data.insert_if_absent(key, value);
            }
        }

        tracing::info!(
            files = records.len(),
            sections = sections.len(),
            warnings = warnings.len(),
            "Built site graph"
        );

        Ok(Site::new(base, records, url_index, sections, warnings))
    }
}
