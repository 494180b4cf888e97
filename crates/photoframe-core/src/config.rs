use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::paths;

/// Fallback fetch interval when the configured value is absent or invalid.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;
/// Topics fetched per batch before pausing.
pub const DEFAULT_BATCH_SIZE: usize = 20;
/// Retention limit — oldest images are evicted beyond this count.
pub const DEFAULT_IMAGE_LIMIT: u32 = 200;

/// Top-level config (photoframe.toml + PHOTOFRAME_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoframeConfig {
    pub discourse: DiscourseConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote forum connection settings. Owned by the user; this subsystem only
/// forwards the credentials as request headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscourseConfig {
    /// Base URL of the Discourse instance, without a trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub api_username: String,
    /// Topics carrying this tag are scanned for images.
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// How often the scheduled fetch job runs, in minutes.
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where downloaded images are kept for the slideshow viewer.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,
    /// Maximum number of stored images.
    #[serde(default = "default_image_limit")]
    pub image_limit: u32,
    #[serde(default = "default_db_path")]
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            image_limit: DEFAULT_IMAGE_LIMIT,
            database: default_db_path(),
        }
    }
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_MINUTES
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_image_limit() -> u32 {
    DEFAULT_IMAGE_LIMIT
}
fn default_image_dir() -> String {
    paths::image_dir().display().to_string()
}
fn default_db_path() -> String {
    paths::db_path().display().to_string()
}

impl PhotoframeConfig {
    /// Load config from a TOML file with PHOTOFRAME_* env var overrides.
    ///
    /// A missing file is [`ConfigError::Missing`] so callers can distinguish
    /// "never set up" from a malformed file.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(std::path::PathBuf::from)
            .unwrap_or_else(paths::config_path);

        if !path.exists() {
            return Err(ConfigError::Missing(path.display().to_string()));
        }

        let config: PhotoframeConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("PHOTOFRAME_").split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(config)
    }
}

/// Write the commented starter config to `path`.
pub fn write_template(path: &Path) -> Result<()> {
    let template = format!(
        r#"# photoframe configuration
#
# Fill in the [discourse] section, then re-run `photoframe install`.
# Any key can be overridden with a PHOTOFRAME_<SECTION>__<KEY> env var.

[discourse]
# Base URL of the Discourse instance, without a trailing slash.
base_url = "https://forum.example.com"
api_key = ""
api_username = ""
# Topics carrying this tag are scanned for images.
tag = "photoframe"

[fetch]
# How often the scheduled fetch job runs, in minutes.
interval_minutes = {interval}
# Topics fetched per batch before pausing.
batch_size = {batch}

[storage]
# Where downloaded images are kept for the slideshow.
image_dir = "{image_dir}"
# Oldest images are deleted beyond this count.
image_limit = {limit}
database = "{database}"
"#,
        interval = DEFAULT_INTERVAL_MINUTES,
        batch = DEFAULT_BATCH_SIZE,
        image_dir = paths::image_dir().display(),
        limit = DEFAULT_IMAGE_LIMIT,
        database = paths::db_path().display(),
    );
    paths::write_atomic(path, &template)?;
    Ok(())
}

/// Record a newly applied interval in the config file, preserving the user's
/// comments and other keys. Heals a missing file from the template.
pub fn persist_interval(path: &Path, minutes: u32) -> Result<()> {
    if !path.exists() {
        write_template(path)?;
    }
    let raw = std::fs::read_to_string(path)?;
    let mut doc: toml_edit::DocumentMut = raw
        .parse()
        .map_err(|e| ConfigError::Invalid(format!("{}: {e}", path.display())))?;
    doc["fetch"]["interval_minutes"] = toml_edit::value(i64::from(minutes));
    paths::write_atomic(path, &doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("photoframe-config-{}-{}", name, std::process::id()))
    }

    #[test]
    fn load_missing_file_reports_missing() {
        let path = temp_config("absent");
        let err = PhotoframeConfig::load(path.to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn template_parses_with_defaults() {
        let path = temp_config("template");
        write_template(&path).unwrap();
        let config = PhotoframeConfig::load(path.to_str()).unwrap();
        assert_eq!(config.fetch.interval_minutes, DEFAULT_INTERVAL_MINUTES);
        assert_eq!(config.fetch.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.storage.image_limit, DEFAULT_IMAGE_LIMIT);
        assert_eq!(config.discourse.tag, "photoframe");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn persist_interval_updates_value_and_keeps_comments() {
        let path = temp_config("persist");
        write_template(&path).unwrap();
        persist_interval(&path, 15).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("interval_minutes = 15"));
        assert!(raw.contains("# photoframe configuration"));

        let config = PhotoframeConfig::load(path.to_str()).unwrap();
        assert_eq!(config.fetch.interval_minutes, 15);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn persist_interval_heals_missing_file() {
        let path = temp_config("heal");
        let _ = std::fs::remove_file(&path);
        persist_interval(&path, 30).unwrap();
        let config = PhotoframeConfig::load(path.to_str()).unwrap();
        assert_eq!(config.fetch.interval_minutes, 30);
        let _ = std::fs::remove_file(&path);
    }
}
