//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use serde_json::Value;

use crate::file::SourceFile;
use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Holds files in memory and returns them from `scan()` in insertion order.
///
/// # Example
///
/// ```ignore
/// use ssg_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("index.md", "# Home")
///     .with_data("index.md", "title", "Home");
///
/// let files = storage.scan().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: Vec<SourceFile>,
    failure: Option<StorageErrorKind>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a buffered file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.push(SourceFile::new(path, contents));
        self
    }

    /// Add a file whose content is a stream.
    #[must_use]
    pub fn with_stream(mut self, path: impl Into<String>) -> Self {
        self.files.push(SourceFile::stream(path));
        self
    }

    /// Attach a data value to a previously added file.
    ///
    /// # Panics
    ///
    /// Panics if no file with `path` was added.
    #[must_use]
    pub fn with_data(mut self, path: &str, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.path == path)
            .unwrap_or_else(|| panic!("no mock file at {path}"));
        file.data.insert(key, value);
        self
    }

    /// Make `scan()` fail with the given error kind.
    #[must_use]
    pub fn with_failure(mut self, kind: StorageErrorKind) -> Self {
        self.failure = Some(kind);
        self
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<SourceFile>, StorageError> {
        if let Some(kind) = self.failure {
            return Err(StorageError::new(kind, "Mock"));
        }
        Ok(self.files.clone())
    }
}
