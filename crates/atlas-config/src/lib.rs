//! Configuration management for Atlas.
//!
//! Parses `atlas.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Caller settings can be applied during load via [`ConfigOverrides`].
//!
//! ## Environment Variable Expansion
//!
//! `content.root` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "atlas.toml";

/// Default revalidation window in seconds.
const DEFAULT_REVALIDATE_SECS: u64 = 3600;

/// Default number of related items.
const DEFAULT_RELATED_COUNT: usize = 20;

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Override content root directory.
    pub root: Option<PathBuf>,
    /// Override locale set.
    pub locales: Option<Vec<String>>,
    /// Override default locale.
    pub default_locale: Option<String>,
    /// Override revalidation window.
    pub revalidate_secs: Option<u64>,
    /// Override related item count.
    pub related_max_count: Option<usize>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (root path is a raw string from TOML).
    content: ContentConfigRaw,
    /// Documentation configuration.
    pub docs: DocsConfig,
    /// Snapshot cache configuration.
    pub cache: CacheConfig,
    /// Related items configuration.
    pub related: RelatedConfig,

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

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    locales: Option<Vec<String>>,
    default_locale: Option<String>,
}

/// Resolved content configuration with an absolute root.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding `<kind>/<locale>/<slug>.md` files.
    pub root: PathBuf,
    /// Configured locales, in display order.
    pub locales: Vec<String>,
    /// Locale served when none is requested.
    pub default_locale: String,
}

/// Documentation configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Section names in navigation order.
    pub sections: Vec<String>,
}

/// Snapshot cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a resolved locale snapshot is reused. Zero disables reuse.
    pub revalidate_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            revalidate_secs: DEFAULT_REVALIDATE_SECS,
        }
    }
}

impl CacheConfig {
    /// Revalidation window as a [`Duration`].
    #[must_use]
    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }
}

/// Related items configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RelatedConfig {
    /// Maximum number of related items per detail page.
    pub max_count: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_RELATED_COUNT,
        }
    }
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
        /// Config field path (e.g., "`content.root`").
        field: String,
        /// Error message (e.g., "${`CONTENT_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require list entries to be non-empty and distinct.
fn require_unique(values: &[String], field: &str) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for value in values {
        require_non_empty(value, field)?;
        if !seen.insert(value.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{field} contains duplicate entry `{value}`"
            )));
        }
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// Uses `config_path` if given, otherwise searches the current directory
    /// and its parents for `atlas.toml`, falling back to defaults rooted at
    /// the current directory. Overrides are applied last, then the result is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicit path does not exist, or
    /// any read, parse, expansion or validation error.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
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

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply overrides to the resolved configuration.
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(root) = &overrides.root {
            self.content_resolved.root.clone_from(root);
        }
        if let Some(locales) = &overrides.locales {
            self.content_resolved.locales.clone_from(locales);
            if overrides.default_locale.is_none()
                && !locales.contains(&self.content_resolved.default_locale)
                && let Some(first) = locales.first()
            {
                self.content_resolved.default_locale.clone_from(first);
            }
        }
        if let Some(default_locale) = &overrides.default_locale {
            self.content_resolved.default_locale.clone_from(default_locale);
        }
        if let Some(revalidate_secs) = overrides.revalidate_secs {
            self.cache.revalidate_secs = revalidate_secs;
        }
        if let Some(max_count) = overrides.related_max_count {
            self.related.max_count = max_count;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
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
            content: ContentConfigRaw::default(),
            docs: DocsConfig::default(),
            cache: CacheConfig::default(),
            related: RelatedConfig::default(),
            content_resolved: ContentConfig {
                root: base.join("public"),
                locales: vec!["en".to_owned()],
                default_locale: "en".to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content()?;
        require_unique(&self.docs.sections, "docs.sections")?;

        if self.related.max_count == 0 {
            return Err(ConfigError::Validation(
                "related.max_count must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate content configuration.
    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;

        if content.locales.is_empty() {
            return Err(ConfigError::Validation(
                "content.locales cannot be empty".to_owned(),
            ));
        }
        require_unique(&content.locales, "content.locales")?;

        if !content.locales.contains(&content.default_locale) {
            return Err(ConfigError::Validation(format!(
                "content.default_locale `{}` is not listed in content.locales",
                content.default_locale
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.content.root {
            self.content.root = Some(expand::expand_path(root, "content.root")?);
        }
        Ok(())
    }

    /// Resolve the content root against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let locales = self
            .content
            .locales
            .clone()
            .unwrap_or_else(|| vec!["en".to_owned()]);
        let default_locale = self
            .content
            .default_locale
            .clone()
            .or_else(|| locales.first().cloned())
            .unwrap_or_default();

        self.content_resolved = ContentConfig {
            root: config_dir.join(self.content.root.as_deref().unwrap_or("public")),
            locales,
            default_locale,
        };
    }
}
