//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for loading content files from a local directory.
//! Files are read into memory and leading YAML front matter is moved into
//! each file's data bag.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::file::{Contents, SourceFile};
use crate::front_matter;
use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Directories never treated as content.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist", "build", "vendor"];

/// Filesystem storage implementation.
///
/// Walks the source directory recursively. Hidden and underscore-prefixed
/// entries are skipped. Directories come before files at each level and
/// names are ordered alphabetically, so scans are deterministic.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use ssg_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::with_patterns(PathBuf::from("content"), &["**/*.md".to_owned()])?;
/// let files = storage.scan()?;
/// ```
pub struct FsStorage {
    /// Root directory of the content.
    source_dir: PathBuf,
    /// Include patterns matched against relative paths. Empty means all files.
    patterns: Vec<Pattern>,
    /// Parse leading YAML front matter into the data bag.
    front_matter: bool,
}

impl FsStorage {
    /// Create a storage that loads every file under `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            patterns: Vec::new(),
            front_matter: true,
        }
    }

    /// Create a storage that only loads files matching one of `patterns`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageErrorKind::InvalidPattern`] error if a pattern
    /// is not a valid glob.
    pub fn with_patterns(source_dir: PathBuf, patterns: &[String]) -> Result<Self, StorageError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    StorageError::new(StorageErrorKind::InvalidPattern, BACKEND).with_source(e)
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            source_dir,
            patterns,
            front_matter: true,
        })
    }

    /// Keep file content untouched instead of extracting front matter.
    #[must_use]
    pub fn without_front_matter(mut self) -> Self {
        self.front_matter = false;
        self
    }

    /// Whether a relative path passes the include patterns.
    fn is_included(&self, rel_path: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(rel_path))
    }

    /// Scan a directory recursively and collect files.
    fn scan_directory(
        &self,
        dir_path: &Path,
        rel_prefix: &str,
        files: &mut Vec<SourceFile>,
    ) -> Result<(), StorageError> {
        let entries = fs::read_dir(dir_path).map_err(|e| StorageError::io(BACKEND, dir_path, e))?;

        // Collect entries with cached file_type to avoid repeated stat calls in sort.
        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                let name = e.file_name().to_string_lossy().into_owned();
                (e, is_dir, name)
            })
            .collect();

        // Sort: directories first, then alphabetical by name
        entries.sort_by(|(_, a_is_dir, a_name), (_, b_is_dir, b_name)| {
            b_is_dir.cmp(a_is_dir).then_with(|| a_name.cmp(b_name))
        });

        for (entry, is_dir, name) in entries {
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }
            if is_dir && SKIPPED_DIRS.contains(&name.as_str()) {
                continue;
            }

            let rel_path = if rel_prefix.is_empty() {
                name
            } else {
                format!("{rel_prefix}/{name}")
            };

            if is_dir {
                self.scan_directory(&entry.path(), &rel_path, files)?;
            } else if self.is_included(&rel_path) {
                files.push(self.load_file(&entry.path(), rel_path)?);
            }
        }

        Ok(())
    }

    /// Read a file and split off its front matter.
    fn load_file(&self, full_path: &Path, rel_path: String) -> Result<SourceFile, StorageError> {
        let bytes = fs::read(full_path).map_err(|e| StorageError::io(BACKEND, full_path, e))?;

        if !self.front_matter {
            return Ok(SourceFile::new(rel_path, bytes));
        }

        let Some((yaml, body)) = std::str::from_utf8(&bytes)
            .ok()
            .and_then(front_matter::split)
        else {
            return Ok(SourceFile::new(rel_path, bytes));
        };

        let data = front_matter::parse(yaml).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidContent, BACKEND)
                .with_path(&rel_path)
                .with_source(e)
        })?;
        tracing::trace!(path = %rel_path, keys = data.len(), "Parsed front matter");

        Ok(SourceFile {
            contents: Contents::Buffer(body.as_bytes().to_vec()),
            data,
            path: rel_path,
        })
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<SourceFile>, StorageError> {
        if !self.source_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        self.scan_directory(&self.source_dir, "", &mut files)?;
        tracing::debug!(
            source_dir = %self.source_dir.display(),
            count = files.len(),
            "Scanned content files"
        );
        Ok(files)
    }
}
