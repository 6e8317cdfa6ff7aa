use std::path::{Path, PathBuf};

use dispatch_core::{DEFAULT_GRID_SIZE, DEFAULT_RECORD_LIMIT, EmergencyStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest map "Display Map" will draw.
pub const MAX_GRID_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(
        "Invalid config file '{}': gridSize {grid_size} exceeds {}",
        .path.display(),
        MAX_GRID_SIZE
    )]
    GridSizeTooLarge { path: PathBuf, grid_size: u32 },
}

/// Settings of an interactive session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Maximum number of records per kind, `None` for no limit
    pub record_limit: Option<usize>,
    /// Side of the square map drawn by "Display Map"
    pub grid_size: u32,
    /// File used by save and load when no file name is entered
    pub data_file: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            record_limit: Some(DEFAULT_RECORD_LIMIT),
            grid_size: DEFAULT_GRID_SIZE,
            data_file: PathBuf::from("emergency_data.txt"),
        }
    }
}

impl ShellConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ShellConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if config.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridSizeTooLarge {
                path: path.to_path_buf(),
                grid_size: config.grid_size,
            });
        }
        Ok(config)
    }

    /// Creates an empty store honouring the configured record limit
    pub fn new_store(&self) -> EmergencyStore {
        match self.record_limit {
            Some(limit) => EmergencyStore::with_record_limit(limit),
            None => EmergencyStore::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_deserialization() {
        let json = r#"
        {
          "recordLimit": 25,
          "gridSize": 8,
          "dataFile": "/var/lib/dispatch/state.txt"
        }
        "#;

        let config: ShellConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.record_limit, Some(25));
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.data_file, PathBuf::from("/var/lib/dispatch/state.txt"));
        assert_eq!(config.new_store().record_limit(), Some(25));
    }

    #[test]
    fn test_defaults() {
        let config: ShellConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.record_limit, Some(10));
        assert_eq!(config.grid_size, 5);
    }

    #[test]
    fn test_unbounded_store() {
        let config: ShellConfig = serde_json::from_str(r#"{"recordLimit": null}"#).unwrap();
        assert_eq!(config.record_limit, None);
        assert_eq!(config.new_store().record_limit(), None);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("dispatch_shell_missing_config.json");
        match ShellConfig::from_file(&path) {
            Err(ConfigError::Read { path: err_path, .. }) => assert_eq!(err_path, path),
            other => panic!("Expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "dispatch_shell_invalid_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"gridSize": "five"}"#).unwrap();
        let result = ShellConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_grid_size_too_large() {
        let path = std::env::temp_dir().join(format!(
            "dispatch_shell_huge_grid_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"gridSize": 4000000000}"#).unwrap();
        let result = ShellConfig::from_file(&path);

        std::fs::write(&path, r#"{"gridSize": 100}"#).unwrap();
        let largest = ShellConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(ConfigError::GridSizeTooLarge {
                grid_size: 4000000000,
                ..
            })
        ));
        assert_eq!(largest.unwrap().grid_size, MAX_GRID_SIZE);
    }
}
