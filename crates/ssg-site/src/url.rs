//! URL derivation from relative content paths.
//!
//! Maps a file's relative path to its canonical URL, its "dirty" URL (the
//! path with filename intact), the URL of the section it belongs to, and
//! whether it is a directory index or the site home.
//!
//! | path             | url                | `section_url` | flags          |
//! |------------------|--------------------|---------------|----------------|
//! | `index.md`       | `/`                | `/`           | index, home    |
//! | `hello.html`     | `/hello.html`      | `/`           |                |
//! | `foo/index.html` | `/foo/`            | `/foo/`       | index          |
//! | `foo/bar.html`   | `/foo/bar.html`    | `/foo/`       |                |
//!
//! With pretty URLs enabled `foo/bar.html` becomes `/foo/bar/`.

use ssg_config::{PrettyUrls, SiteConfig};

/// Error for paths that cannot be mapped to a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path has no segments.
    #[error("path is empty")]
    Empty,
    /// Path starts at the filesystem root.
    #[error("path is absolute")]
    Absolute,
    /// A `..` segment walks above the content root.
    #[error("path escapes the content root")]
    EscapesRoot,
}

/// Base URL prefix, normalized once at configuration time.
///
/// A single trailing slash is stripped, except for a base of just `/`,
/// which is kept as-is and behaves like the empty base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Normalize a configured base URL.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let normalized = if raw.len() > 1 {
            raw.strip_suffix('/').unwrap_or(raw)
        } else {
            raw
        };
        Self(normalized.to_owned())
    }

    /// The normalized base URL (e.g., `""`, `"/"`, `"/path/to/site"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix used when joining (never ends with `/`).
    fn prefix(&self) -> &str {
        self.0.trim_end_matches('/')
    }

    /// URL of the site root (e.g., `"/"`, `"/path/to/site/"`).
    #[must_use]
    pub fn root(&self) -> String {
        format!("{}/", self.prefix())
    }

    /// Join a relative path onto the base.
    #[must_use]
    pub fn join(&self, rel: &str) -> String {
        format!("{}/{rel}", self.prefix())
    }

    /// Remove the root prefix from a URL, returning the relative part.
    ///
    /// Returns `None` for URLs outside the base.
    #[must_use]
    pub fn strip<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.prefix())?.strip_prefix('/')
    }

    /// Number of path segments below the root (`/` is 0, `/foo/bar.html` is 2).
    #[must_use]
    pub fn depth(&self, url: &str) -> usize {
        self.strip(url)
            .map_or(0, |rel| rel.split('/').filter(|s| !s.is_empty()).count())
    }
}

/// Normalize a relative path: `/` separators, no `.` segments, `..` resolved.
///
/// # Errors
///
/// Returns [`PathError`] if the path is empty, absolute, or escapes the root.
pub fn normalize_path(path: &str) -> Result<String, PathError> {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        return Err(PathError::Absolute);
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(PathError::EscapesRoot);
                }
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(segments.join("/"))
}

/// URLs and structural flags derived for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedUrl {
    /// Normalized relative path.
    pub path: String,
    /// Canonical URL.
    pub url: String,
    /// URL keeping the original filename.
    pub dirty_url: String,
    /// URL of the section the file belongs to.
    pub section_url: String,
    /// File is a directory index.
    pub is_index: bool,
    /// File is the index at the site root.
    pub is_home: bool,
}

/// Derives URLs from relative paths under one configuration.
#[derive(Debug, Clone)]
pub struct UrlDeriver {
    base: BaseUrl,
    index_name: String,
    pretty_urls: PrettyUrls,
}

impl UrlDeriver {
    /// Create a deriver from site configuration.
    #[must_use]
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            base: BaseUrl::new(&config.base_url),
            index_name: config.index_name.clone(),
            pretty_urls: config.pretty_urls.clone(),
        }
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Derive URLs for a relative path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if the path cannot be normalized.
    pub fn derive(&self, path: &str) -> Result<DerivedUrl, PathError> {
        let path = normalize_path(path)?;
        let (dir, name) = path.rsplit_once('/').unwrap_or(("", path.as_str()));

        let is_index = is_index_name(name, &self.index_name);
        let is_home = is_index && dir.is_empty();

        let dir_url = if dir.is_empty() {
            self.base.root()
        } else {
            self.base.join(&format!("{dir}/"))
        };

        let url = if is_index {
            dir_url.clone()
        } else if self.pretty_urls.applies_to(name) {
            format!("{dir_url}{}/", strip_extension(name))
        } else {
            self.base.join(&path)
        };

        let section_url = if is_index { url.clone() } else { dir_url };

        Ok(DerivedUrl {
            dirty_url: self.base.join(&path),
            url,
            section_url,
            is_index,
            is_home,
            path,
        })
    }
}

/// Whether `name` is `index_name` followed by nothing or by extensions.
///
/// With `index_name = "index"`, `index`, `index.html` and `index.en.html`
/// match; `indexes.html` does not.
fn is_index_name(name: &str, index_name: &str) -> bool {
    name.strip_prefix(index_name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Drop the last extension of a file name (dotfiles keep their name).
fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
