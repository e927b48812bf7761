//! Content file model.

use serde_json::Value;

use crate::data::DataBag;

/// How a file's content is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// No content (placeholder entries such as directories).
    Null,
    /// Fully materialized content.
    Buffer(Vec<u8>),
    /// Content only available as a stream; never materialized.
    Stream,
}

/// A content file travelling through the pipeline.
///
/// `path` is relative to the content root and uses `/` separators.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Relative path (e.g., "index.md", "guide/setup.md").
    pub path: String,
    /// File content.
    pub contents: Contents,
    /// Data attached by pipeline stages.
    pub data: DataBag,
}

impl SourceFile {
    /// Create a file with buffered content.
    #[must_use]
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Buffer(contents.into()),
            data: DataBag::new(),
        }
    }

    /// Create a file without content.
    #[must_use]
    pub fn null(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Null,
            data: DataBag::new(),
        }
    }

    /// Create a file whose content is a stream.
    #[must_use]
    pub fn stream(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Stream,
            data: DataBag::new(),
        }
    }

    /// Attach a data value (builder style).
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key, value);
        self
    }

    /// Replace the whole data bag (builder style).
    #[must_use]
    pub fn with_data_bag(mut self, data: DataBag) -> Self {
        self.data = data;
        self
    }

    /// True if the file carries no content.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    /// True if the content is a stream.
    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream)
    }

    /// Buffered content, if materialized.
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(bytes) => Some(bytes),
            Contents::Null | Contents::Stream => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_is_buffered() {
        let file = SourceFile::new("guide.md", "# Guide");

        assert_eq!(file.path, "guide.md");
        assert_eq!(file.bytes(), Some(b"# Guide".as_slice()));
        assert!(!file.is_null());
        assert!(!file.is_stream());
        assert!(file.data.is_empty());
    }

    #[test]
    fn test_null_and_stream_have_no_bytes() {
        let null = SourceFile::null("assets");
        let stream = SourceFile::stream("video.mp4");

        assert!(null.is_null());
        assert!(null.bytes().is_none());
        assert!(stream.is_stream());
        assert!(stream.bytes().is_none());
    }

    #[test]
    fn test_with_data() {
        let file = SourceFile::new("index.md", "").with_data("order", 3);

        assert_eq!(file.data.get("order"), Some(&Value::from(3)));
    }
}
