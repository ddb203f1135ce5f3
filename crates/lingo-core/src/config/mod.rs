mod defaults;


use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::LingoError;
use crate::locale::Locale;
use defaults::*;

/// Top-level lingo configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lingo: LingoConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LingoConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Optional log file. Empty = log to stderr only.
    #[serde(default)]
    pub log_file: String,
}

impl Default for LingoConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

/// What to do with a message entry that breaks the TS schema.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Any violation fails the whole locale (default, never drops a translation silently).
    #[default]
    Strict,
    /// Skip the offending entry, warn, and keep loading the rest.
    Lenient,
}

impl LoadPolicy {
    /// Human-readable name for display.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

/// Catalog discovery and lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding `<prefix><locale>.ts` files.
    #[serde(default = "default_translations_dir")]
    pub translations_dir: String,
    /// File name prefix, e.g. `"daq_"` for `daq_ru_RU.ts`.
    #[serde(default)]
    pub file_prefix: String,
    /// Locale used when none is requested. Empty = detect from the environment.
    #[serde(default)]
    pub default_locale: String,
    #[serde(default)]
    pub policy: LoadPolicy,
    /// Resolve translations marked `unfinished` (Qt lrelease default).
    #[serde(default = "default_true")]
    pub include_unfinished: bool,
    /// Fall back to catalogs compiled into the binary when no file is found.
    #[serde(default = "default_true")]
    pub use_bundled: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            translations_dir: default_translations_dir(),
            file_prefix: String::new(),
            default_locale: String::new(),
            policy: LoadPolicy::default(),
            include_unfinished: true,
            use_bundled: true,
        }
    }
}

impl CatalogConfig {
    /// Translations directory with `~` expanded.
    pub fn translations_path(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.translations_dir))
    }

    /// Resolve the locale to use: explicit request, then `default_locale`,
    /// then the process environment.
    pub fn resolve_locale(&self, requested: Option<&str>) -> Result<Locale, LingoError> {
        if let Some(r) = requested.filter(|r| !r.trim().is_empty()) {
            return r.parse();
        }
        if !self.default_locale.trim().is_empty() {
            return self.default_locale.parse();
        }
        Locale::from_env().ok_or_else(|| {
            LingoError::Config(
                "no locale requested, no default_locale configured, \
                 and none found in LC_ALL/LC_MESSAGES/LANG"
                    .to_string(),
            )
        })
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, LingoError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| LingoError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| LingoError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
