//! Options shared by every command that builds the site graph.

use std::path::PathBuf;

use clap::Args;
use ssg_config::{CliSettings, Config};
use ssg_site::{Site, SiteBuilder, SiteError};
use ssg_storage::{FsStorage, Storage};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for loading content and building the site graph.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover ssg.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Prefix for every derived URL (overrides config).
    #[arg(long, env = "SSG_BASE_URL")]
    base_url: Option<String>,

    /// Use directory-style URLs for non-index files.
    #[arg(long)]
    pretty_urls: Option<bool>,

    /// Data property used to order children and siblings (overrides config).
    #[arg(long)]
    sort: Option<String>,

    /// Keep input order instead of sorting.
    #[arg(long, conflicts_with = "sort")]
    no_sort: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load configuration, scan content and build the site graph.
    ///
    /// Files whose path cannot be mapped to a URL are skipped with a warning.
    pub(crate) fn load_site(&self, output: &Output) -> Result<Site, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            base_url: self.base_url.clone(),
            pretty_urls: self.pretty_urls,
            sort: self.resolve_sort(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            config_path = ?config.config_path,
            base_url = %config.site.base_url,
            sort = ?config.site.sort,
            "Loaded configuration"
        );

        let source_dir = &config.content_resolved.source_dir;
        output.info(&format!("Source directory: {}", source_dir.display()));

        let storage =
            FsStorage::with_patterns(source_dir.clone(), &config.content_resolved.patterns)?;
        let files = storage.scan()?;

        let mut builder = SiteBuilder::new(config.site)?;
        for file in files {
            match builder.accumulate(file) {
                Ok(()) => {}
                Err(err @ SiteError::InvalidPath { .. }) => {
                    tracing::debug!(error = %err, "Skipping file");
                    output.warning(&format!("Skipping file: {err}"));
                }
                Err(err) => return Err(err.into()),
            }
        }
        let site = builder.finalize()?;

        for warning in site.warnings() {
            output.warning(&format!("Duplicate URL: {warning}"));
        }
        output.info(&format!(
            "Built site graph: {} files, {} sections",
            site.len(),
            site.sections().len()
        ));

        Ok(site)
    }

    /// Resolve the sort override from --sort/--no-sort flags.
    fn resolve_sort(&self) -> Option<String> {
        self.no_sort.then(String::new).or_else(|| self.sort.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn args(config: PathBuf) -> SiteArgs {
        SiteArgs {
            config: Some(config),
            source_dir: None,
            base_url: None,
            pretty_urls: None,
            sort: None,
            no_sort: false,
            verbose: false,
        }
    }

    fn write(path: &std::path::Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_site_from_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("ssg.toml");
        write(&config_path, "[site]\nbase_url = \"/docs/\"\n");
        write(&dir.path().join("content/index.html"), "");
        write(&dir.path().join("content/foo/index.html"), "");
        write(&dir.path().join("content/foo/bar.html"), "");

        let site = args(config_path).load_site(&Output::new()).unwrap();

        assert_eq!(site.len(), 3);
        assert_eq!(site.root().unwrap().url(), "/docs/");
        let bar = site.get("/docs/foo/bar.html").unwrap();
        let parent = site.file(bar.parent().unwrap());
        assert_eq!(parent.url(), "/docs/foo/");
    }

    #[test]
    fn test_load_site_source_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("ssg.toml");
        write(&config_path, "[site]\n");
        write(&dir.path().join("pages/hello.html"), "");

        let mut args = args(config_path);
        args.source_dir = Some(dir.path().join("pages"));
        args.base_url = Some("/blog".to_owned());
        let site = args.load_site(&Output::new()).unwrap();

        assert_eq!(site.len(), 1);
        assert!(site.root().is_none());
        assert!(site.get("/blog/hello.html").is_some());
    }

    #[test]
    fn test_resolve_sort() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path().join("ssg.toml"));
        assert_eq!(args.resolve_sort(), None);

        args.sort = Some("title".to_owned());
        assert_eq!(args.resolve_sort(), Some("title".to_owned()));

        args.sort = None;
        args.no_sort = true;
        assert_eq!(args.resolve_sort(), Some(String::new()));
    }
}
