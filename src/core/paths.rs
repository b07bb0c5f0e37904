// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, COMMANDS_FILENAME, COMPLETION_DIR, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref CMD_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not create directory at '{path}': {source}")]
    DirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path to the `cmd` configuration directory (`~/.config/cmd`).
/// Creates it if it doesn't exist.
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value.
pub fn get_cmd_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = CMD_CONFIG_DIR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR_NAME);
    ensure_dir(&config_path)?;

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// The user's global command collection, `<config dir>/commands.json`.
pub fn global_commands_path(config_dir: &Path) -> PathBuf {
    config_dir.join(COMMANDS_FILENAME)
}

/// The settings file, `<config dir>/config.toml`.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILENAME)
}

/// Where the shell completion scripts are installed. Created on demand.
pub fn completion_dir(config_dir: &Path) -> Result<PathBuf, PathError> {
    let dir = config_dir.join(COMPLETION_DIR);
    ensure_dir(&dir)?;
    Ok(dir)
}

fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| PathError::DirCreation {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = completion_dir(tmp.path()).unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, tmp.path().join("completion"));
        assert_eq!(
            global_commands_path(tmp.path()),
            tmp.path().join("commands.json")
        );
        assert_eq!(config_file_path(tmp.path()), tmp.path().join("config.toml"));
    }
}
