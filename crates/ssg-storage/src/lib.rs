//! Content file model and storage backends for ssg.
//!
//! This crate provides the [`SourceFile`] type that flows through a site
//! build, its [`DataBag`], and a [`Storage`] trait for loading files from
//! a backend. Keeping I/O here lets the site graph builder stay a pure,
//! in-memory transform.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`SourceFile`] and [`Contents`]: a relative path, content, and data
//! - [`DataBag`]: per-file data with insert-if-absent merging
//! - [`Storage`] trait with `scan()`
//! - [`FsStorage`] for loading a content directory (with YAML front matter)
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use ssg_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("content"));
//! for file in storage.scan()? {
//!     println!("{} ({} data keys)", file.path, file.data.len());
//! }
//! ```

mod data;
mod file;
mod front_matter;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use data::DataBag;
pub use file::{Contents, SourceFile};
pub use front_matter::FrontMatterError;
pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
