//! Site builder errors.

use ssg_config::ConfigError;

use crate::url::PathError;

/// Errors raised while building a site graph.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Options failed validation.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// A file was supplied as a stream. The file is rejected and the build
    /// can no longer be finalized.
    #[error("Streaming not supported: {path}")]
    UnsupportedInput { path: String },
    /// A file's path cannot be mapped to a URL. Only that file is rejected.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath {
        path: String,
        #[source]
        reason: PathError,
    },
    /// Two files resolved to the same URL under the `error` duplicate policy.
    #[error("Duplicate URL {url}: {path} resolves to the same URL as {existing}")]
    DuplicateUrl {
        url: String,
        existing: String,
        path: String,
    },
    /// The builder was used after finalization.
    #[error("Site builder is already finalized")]
    Finalized,
    /// Finalization was refused because streamed input was rejected.
    #[error("Build aborted, streaming input was rejected: {}", .paths.join(", "))]
    Aborted { paths: Vec<String> },
}
