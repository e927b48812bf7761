//! Configuration management for ssg.
//!
//! Parses `ssg.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`

mod expand;

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override base URL.
    pub base_url: Option<String>,
    /// Override pretty URL mode.
    pub pretty_urls: Option<bool>,
    /// Override the sort property (empty string disables sorting).
    pub sort: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ssg.toml";

/// Property used as sort key when none is configured.
pub const DEFAULT_SORT: &str = "url";

/// Basename treated as a directory index when none is configured.
pub const DEFAULT_INDEX_NAME: &str = "index";

/// Section fields that copied properties may not shadow.
const RESERVED_SECTION_KEYS: &[&str] = &["name", "url", "sections", "files"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site graph configuration.
    pub site: SiteConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site graph configuration (`[site]` table).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix prepended to every derived URL.
    pub base_url: String,
    /// Data property used as sort key. `None` preserves input order.
    #[serde(deserialize_with = "deserialize_sort")]
    pub sort: Option<String>,
    /// Properties copied from a section's index file onto the section.
    pub section_properties: Vec<String>,
    /// Basename (without extension) of directory index files.
    pub index_name: String,
    /// Directory-style URLs for non-index files.
    pub pretty_urls: PrettyUrls,
    /// What to do when two files resolve to the same URL.
    pub duplicate_urls: DuplicatePolicy,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            sort: Some(DEFAULT_SORT.to_owned()),
            section_properties: Vec::new(),
            index_name: DEFAULT_INDEX_NAME.to_owned(),
            pretty_urls: PrettyUrls::default(),
            duplicate_urls: DuplicatePolicy::default(),
        }
    }
}

impl SiteConfig {
    /// Validate site graph settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the index name or a section
    /// property is empty, or the base URL has an unsupported shape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.index_name, "site.index_name")?;
        if self.index_name.contains('/') || self.index_name.contains('\\') {
            return Err(ConfigError::Validation(
                "site.index_name cannot contain path separators".to_owned(),
            ));
        }

        if !self.base_url.is_empty()
            && !self.base_url.starts_with('/')
            && !self.base_url.starts_with("http://")
            && !self.base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "site.base_url must start with /, http:// or https://".to_owned(),
            ));
        }
        if self.base_url.contains(['?', '#']) {
            return Err(ConfigError::Validation(
                "site.base_url cannot contain a query or fragment".to_owned(),
            ));
        }

        for name in &self.section_properties {
            require_non_empty(name, "site.section_properties entry")?;
            if RESERVED_SECTION_KEYS.contains(&name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "site.section_properties cannot include reserved key '{name}'"
                )));
            }
        }

        if let PrettyUrls::Extensions(extensions) = &self.pretty_urls {
            for ext in extensions {
                require_non_empty(ext.trim_start_matches('.'), "site.pretty_urls entry")?;
            }
        }

        Ok(())
    }
}

/// Accept `sort = "field"`, `sort = true` or `sort = false`.
fn deserialize_sort<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Name(String),
        Flag(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Name(name) if name.is_empty() => None,
        Raw::Name(name) => Some(name),
        Raw::Flag(true) => Some(DEFAULT_SORT.to_owned()),
        Raw::Flag(false) => None,
    })
}

/// Pretty URL mode: a flag, or the list of extensions it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PrettyUrls {
    /// Applies to every non-index file when `true`.
    Enabled(bool),
    /// Applies to non-index files with one of these extensions.
    Extensions(Vec<String>),
}

impl Default for PrettyUrls {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

impl PrettyUrls {
    /// Whether a file with the given name gets a directory-style URL.
    ///
    /// Extensions match case-insensitively, with or without a leading dot.
    #[must_use]
    pub fn applies_to(&self, file_name: &str) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Extensions(extensions) => {
                let Some((_, ext)) = file_name.rsplit_once('.') else {
                    return false;
                };
                extensions
                    .iter()
                    .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
            }
        }
    }
}

/// Duplicate URL handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later file replaces the earlier one; a warning is recorded.
    #[default]
    Warn,
    /// Later file is rejected with an error.
    Error,
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    patterns: Option<Vec<String>>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding the content files.
    pub source_dir: PathBuf,
    /// Glob patterns selecting content files. Empty selects every file.
    pub patterns: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `ssg.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, and the
    /// result is validated again so overrides cannot bypass validation.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(base_url) = &settings.base_url {
            self.site.base_url.clone_from(base_url);
        }
        if let Some(pretty_urls) = settings.pretty_urls {
            self.site.pretty_urls = PrettyUrls::Enabled(pretty_urls);
        }
        if let Some(sort) = &settings.sort {
            self.site.sort = (!sort.is_empty()).then(|| sort.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            content: ContentConfigRaw::default(),
            content_resolved: ContentConfig {
                source_dir: base.join("content"),
                patterns: Vec::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.site.validate()
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.content_resolved = ContentConfig {
            source_dir: config_dir.join(self.content.source_dir.as_deref().unwrap_or("content")),
            patterns: self.content.patterns.clone().unwrap_or_default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.base_url, "");
        assert_eq!(config.site.sort.as_deref(), Some("url"));
        assert_eq!(config.site.index_name, "index");
        assert!(config.site.section_properties.is_empty());
        assert_eq!(config.site.pretty_urls, PrettyUrls::Enabled(false));
        assert_eq!(config.site.duplicate_urls, DuplicatePolicy::Warn);
        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/test/content")
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site, SiteConfig::default());
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
base_url = "/path/to/site"
sort = "order"
section_properties = ["title", "description"]
index_name = "README"
duplicate_urls = "error"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.base_url, "/path/to/site");
        assert_eq!(config.site.sort.as_deref(), Some("order"));
        assert_eq!(
            config.site.section_properties,
            vec!["title".to_owned(), "description".to_owned()]
        );
        assert_eq!(config.site.index_name, "README");
        assert_eq!(config.site.duplicate_urls, DuplicatePolicy::Error);
    }

    #[test]
    fn test_parse_sort_disabled() {
        let config: Config = toml::from_str("[site]\nsort = false\n").unwrap();
        assert_eq!(config.site.sort, None);

        let config: Config = toml::from_str("[site]\nsort = \"\"\n").unwrap();
        assert_eq!(config.site.sort, None);
    }

    #[test]
    fn test_parse_sort_true_uses_default_key() {
        let config: Config = toml::from_str("[site]\nsort = true\n").unwrap();
        assert_eq!(config.site.sort.as_deref(), Some("url"));
    }

    #[test]
    fn test_parse_pretty_urls_flag() {
        let config: Config = toml::from_str("[site]\npretty_urls = true\n").unwrap();
        assert_eq!(config.site.pretty_urls, PrettyUrls::Enabled(true));
    }

    #[test]
    fn test_parse_pretty_urls_extensions() {
        let config: Config =
            toml::from_str("[site]\npretty_urls = [\".html\", \"md\"]\n").unwrap();
        assert_eq!(
            config.site.pretty_urls,
            PrettyUrls::Extensions(vec![".html".to_owned(), "md".to_owned()])
        );
    }

    #[test]
    fn test_pretty_urls_applies_to() {
        let pretty = PrettyUrls::Extensions(vec![".html".to_owned(), "md".to_owned()]);
        assert!(pretty.applies_to("hello.html"));
        assert!(pretty.applies_to("hello.MD"));
        assert!(!pretty.applies_to("feed.xml"));
        assert!(!pretty.applies_to("LICENSE"));

        assert!(PrettyUrls::Enabled(true).applies_to("feed.xml"));
        assert!(!PrettyUrls::Enabled(false).applies_to("hello.html"));
    }

    #[test]
    fn test_parse_unknown_duplicate_policy_fails() {
        let result: Result<Config, _> = toml::from_str("[site]\nduplicate_urls = \"ignore\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[content]
source_dir = "src/pages"
patterns = ["**/*.md"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/project/src/pages")
        );
        assert_eq!(config.content_resolved.patterns, vec!["**/*.md".to_owned()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssg.toml");
        std::fs::write(&path, "[site]\nbase_url = \"/blog/\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.base_url, "/blog/");
        assert_eq!(config.content_resolved.source_dir, dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/ssg.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssg.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            base_url: Some("relative/base".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/content")),
            base_url: Some("/docs".to_owned()),
            pretty_urls: Some(true),
            sort: Some("order".to_owned()),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/custom/content")
        );
        assert_eq!(config.site.base_url, "/docs");
        assert_eq!(config.site.pretty_urls, PrettyUrls::Enabled(true));
        assert_eq!(config.site.sort.as_deref(), Some("order"));
    }

    #[test]
    fn test_apply_cli_settings_empty_sort_disables() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            sort: Some(String::new()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.site.sort, None);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.site, SiteConfig::default());
        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/test/content")
        );
    }

    #[test]
    fn test_expand_env_vars_base_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SSG_CONFIG_TEST_BASE", "/from-env");
        }

        let mut config: Config =
            toml::from_str("[site]\nbase_url = \"${SSG_CONFIG_TEST_BASE}\"\n").unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.site.base_url, "/from-env");

        unsafe {
            std::env::remove_var("SSG_CONFIG_TEST_BASE");
        }
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(site: &SiteConfig, expected_substrings: &[&str]) {
        let err = site.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_index_name_empty() {
        let site = SiteConfig {
            index_name: String::new(),
            ..Default::default()
        };
        assert_validation_error(&site, &["site.index_name", "empty"]);
    }

    #[test]
    fn test_validate_index_name_with_separator() {
        let site = SiteConfig {
            index_name: "docs/index".to_owned(),
            ..Default::default()
        };
        assert_validation_error(&site, &["site.index_name", "separators"]);
    }

    #[test]
    fn test_validate_base_url_shapes() {
        for base_url in ["", "/", "/path/to/site/", "https://example.com/blog"] {
            let site = SiteConfig {
                base_url: base_url.to_owned(),
                ..Default::default()
            };
            assert!(site.validate().is_ok(), "{base_url} should be valid");
        }

        let site = SiteConfig {
            base_url: "/site?draft=1".to_owned(),
            ..Default::default()
        };
        assert_validation_error(&site, &["site.base_url", "query"]);
    }

    #[test]
    fn test_validate_empty_section_property() {
        let site = SiteConfig {
            section_properties: vec!["title".to_owned(), String::new()],
            ..Default::default()
        };
        assert_validation_error(&site, &["section_properties", "empty"]);
    }

    #[test]
    fn test_validate_reserved_section_property() {
        let site = SiteConfig {
            section_properties: vec!["url".to_owned()],
            ..Default::default()
        };
        assert_validation_error(&site, &["section_properties", "reserved", "'url'"]);
    }

    #[test]
    fn test_validate_empty_pretty_extension() {
        let site = SiteConfig {
            pretty_urls: PrettyUrls::Extensions(vec![".".to_owned()]),
            ..Default::default()
        };
        assert_validation_error(&site, &["pretty_urls", "empty"]);
    }
}
