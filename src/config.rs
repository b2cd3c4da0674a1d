//! Session configuration and data directory resolution.

use crate::constants::{DB_FILE_NAME, DEFAULT_CATEGORY_TITLE, PINNED_CATEGORY_TITLE};
use crate::error::AppError;
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Title of the synthetic category that holds pinned trackers.
    pub pinned_category_title: String,
    /// Category for trackers that don't name one.
    pub default_category_title: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pinned_category_title: PINNED_CATEGORY_TITLE.to_string(),
            default_category_title: DEFAULT_CATEGORY_TITLE.to_string(),
        }
    }
}

impl SessionConfig {
    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::read("config", e)),
        };

        serde_json::from_str(&contents).map_err(|e| AppError::InvalidInput {
            field: "config",
            reason: e.to_string(),
        })
    }
}

/// Error type for data directory resolution
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Could not determine project directories")]
    NoProjectDirs,
    #[error("Could not create data directory: {0}")]
    DataDirCreation(std::io::Error),
}

/// Platform data directory joined with the database file name. The
/// directory is created if needed.
pub fn default_db_path() -> Result<PathBuf, InitError> {
    let proj_dirs = ProjectDirs::from("com", "habitual", "Habitual").ok_or(InitError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
    Ok(data_dir.join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = SessionConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.pinned_category_title, "Pinned");
        assert_eq!(config.default_category_title, "Important");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "pinned_category_title": "Закрепленные" }"#).unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.pinned_category_title, "Закрепленные");
        assert_eq!(config.default_category_title, "Important");
    }

    #[test]
    fn test_malformed_file_is_invalid_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SessionConfig::load(&path).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { field: "config", .. }));
    }

    #[test]
    fn test_init_error_messages() {
        assert_eq!(
            InitError::NoProjectDirs.to_string(),
            "Could not determine project directories"
        );
    }
}
