//! Filesystem layout — everything under `~/.photoframe` unless overridden.

use std::path::{Path, PathBuf};

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

/// Application data directory (`~/.photoframe`). Scheduled runs use this as
/// their working directory.
pub fn data_dir() -> PathBuf {
    home_dir().join(".photoframe")
}

/// Config file location: `PHOTOFRAME_CONFIG` env var, else
/// `~/.photoframe/photoframe.toml`.
pub fn config_path() -> PathBuf {
    std::env::var("PHOTOFRAME_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("photoframe.toml"))
}

pub fn db_path() -> PathBuf {
    data_dir().join("photoframe.db")
}

pub fn image_dir() -> PathBuf {
    data_dir().join("images")
}

pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Fetch log. Written by the native scheduler's stream redirection, read by
/// `photoframe status`.
pub fn log_path() -> PathBuf {
    log_dir().join("photoframe.log")
}

/// Write `contents` through a temporary sibling and rename, so the
/// destination is never left truncated by a failure mid-write.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hangs_off_data_dir() {
        let base = data_dir();
        assert!(db_path().starts_with(&base));
        assert!(image_dir().starts_with(&base));
        assert!(log_path().starts_with(log_dir()));
    }

    #[test]
    fn write_atomic_replaces_contents() {
        let path = std::env::temp_dir().join(format!("photoframe-paths-{}.txt", std::process::id()));
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let _ = std::fs::remove_file(&path);
    }
}
