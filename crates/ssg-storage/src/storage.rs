//! Storage trait and error types.
//!
//! Every [`SourceFile`] returned by a backend carries a path relative to the
//! content root with `/` separators (e.g., `"index.md"`, `"guide/setup.md"`).
//! URLs are derived later by the site graph builder, never by storage.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::file::SourceFile;

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    /// An include pattern is not a valid glob.
    InvalidPattern,
    /// Content could not be decoded (e.g., malformed front matter).
    InvalidContent,
    Other,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidPattern => "Invalid pattern",
            Self::InvalidContent => "Invalid content",
            Self::Other => "Error",
        })
    }
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Error raised by a storage backend.
///
/// Displays as `[Backend] Kind: source (path: p)`.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: &'static str,
    /// Offending file or directory, if known.
    pub path: Option<PathBuf>,
    source: Option<BoxedSource>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind, backend: &'static str) -> Self {
        Self {
            kind,
            backend,
            path: None,
            source: None,
        }
    }

    /// Map an I/O failure on `path` to an error of the matching kind.
    #[must_use]
    pub fn io(backend: &'static str, path: &Path, err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        Self::new(kind, backend).with_path(path).with_source(err)
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.backend, self.kind)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

/// Source of content files for a site build.
///
/// Backends materialize every file they return: contents are buffered and
/// front matter (if the backend understands it) is already moved into the
/// file's data bag.
pub trait Storage: Send + Sync {
    /// Load all content files in a deterministic, backend-defined order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if scanning fails (e.g., permission denied,
    /// malformed front matter).
    fn scan(&self) -> Result<Vec<SourceFile>, StorageError>;
}
