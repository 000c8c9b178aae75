use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_ENV_VAR: &str = "FILEPANE_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edge length in pixels of generated thumbnails.
    pub thumbnail_size: u32,
    pub thumbnail_cache_entries: usize,
    /// Budget over decoded pixel bytes held by the thumbnail cache.
    pub thumbnail_cache_bytes: usize,
    pub preview_bytes: usize,
    pub show_hidden: bool,
    pub protect_system_paths: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thumbnail_size: 128,
            thumbnail_cache_entries: 512,
            thumbnail_cache_bytes: 64 * 1024 * 1024,
            preview_bytes: 10_000,
            show_hidden: true,
            protect_system_paths: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("filepane").join(CONFIG_FILE_NAME))
    }

    /// Loads `path`, or the default location when `None`. A missing file yields
    /// the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let resolved = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match resolved {
            Some(p) if p.is_file() => {
                let raw = fs::read_to_string(&p)
                    .map_err(|e| AppError::Config(format!("{}: {e}", p.display())))?;
                Self::from_json(&raw)?
            }
            Some(p) if path.is_some() => {
                return Err(AppError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            _ => Self::default(),
        };

        if let Ok(level) = std::env::var(LOG_ENV_VAR) {
            if !level.trim().is_empty() {
                config.log_level = level.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.thumbnail_size == 0 {
            return Err(AppError::Config("thumbnail_size must be positive".to_string()));
        }
        if self.thumbnail_cache_entries == 0 {
            return Err(AppError::Config(
                "thumbnail_cache_entries must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_json(r#"{ "thumbnail_size": 64 }"#).unwrap();
        assert_eq!(config.thumbnail_size, 64);
        assert_eq!(config.preview_bytes, 10_000);
        assert!(config.show_hidden);
    }

    #[test]
    fn zero_thumbnail_size_rejected() {
        assert!(Config::from_json(r#"{ "thumbnail_size": 0 }"#).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.json")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "show_hidden": false, "preview_bytes": 42 }"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.show_hidden);
        assert_eq!(config.preview_bytes, 42);
    }
}
