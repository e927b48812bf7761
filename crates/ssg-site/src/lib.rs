//! Site graph construction for ssg.
//!
//! This crate provides:
//! - [`SiteBuilder`]: two-phase builder that derives URLs per file and then
//!   links the complete set
//! - [`Site`]: the finished graph with root, parent, children, siblings and
//!   section lookups
//! - [`SectionTree`]: hierarchical sections built from directory index files
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ssg_config::SiteConfig;
//! use ssg_site::build_site;
//! use ssg_storage::SourceFile;
//!
//! let files = vec![
//!     SourceFile::new("index.html", "home"),
//!     SourceFile::new("foo/index.html", "foo"),
//!     SourceFile::new("foo/bar.html", "bar"),
//! ];
//! let site = build_site(SiteConfig::default(), files)?;
//!
//! let bar = site.get("/foo/bar.html").unwrap();
//! assert_eq!(site.parent(bar.id()).unwrap().url(), "/foo/");
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod graph;
mod record;
mod section;
mod site;
mod sort;
mod url;

pub use builder::SiteBuilder;
pub use error::SiteError;
pub use record::{FileId, FileRecord, keys};
pub use section::{Section, SectionId, SectionNode, SectionTree};
pub use site::{DuplicateWarning, Site};
pub use sort::SortPolicy;
pub use url::{BaseUrl, DerivedUrl, PathError, UrlDeriver, normalize_path};

use ssg_config::SiteConfig;
use ssg_storage::SourceFile;

/// Build a site from a complete set of files, stopping at the first error.
///
/// # Errors
///
/// Returns the first [`SiteError`] raised by [`SiteBuilder::accumulate`]
/// or [`SiteBuilder::finalize`].
pub fn build_site<I>(config: SiteConfig, files: I) -> Result<Site, SiteError>
where
    I: IntoIterator<Item = SourceFile>,
{
    let mut builder = SiteBuilder::new(config)?;
    for file in files {
        builder.accumulate(file)?;
    }
    builder.finalize()
}
