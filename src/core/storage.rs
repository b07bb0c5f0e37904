// src/core/storage.rs

//! Reading and writing command collection files (`commands.json`).

use crate::models::Command;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not access command file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Command file '{path}' is not valid: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Loads every record of the file at `path`. A missing file is an empty collection.
pub fn load_commands(path: &Path) -> Result<Vec<Command>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    let records: Vec<Command> =
        serde_json::from_str(&content).map_err(|e| StorageError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(records.into_iter().map(Command::normalized).collect())
}

/// Writes `records` to `path` atomically, creating parent directories if needed.
pub fn save_commands(path: &Path, records: &[Command]) -> Result<(), StorageError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;

    let content = serde_json::to_string_pretty(records).map_err(|e| StorageError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| StorageError::io(parent, e))?;
    temp_file
        .write_all(content.as_bytes())
        .and_then(|()| temp_file.write_all(b"\n"))
        .map_err(|e| StorageError::io(path, e))?;
    temp_file
        .persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;
    log::debug!("Saved {} command(s) to '{}'", records.len(), path.display());
    Ok(())
}

/// Creates an empty collection at `path` unless a file is already there.
pub fn ensure_commands_file(path: &Path) -> Result<(), StorageError> {
    if path.exists() {
        return Ok(());
    }
    save_commands(path, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Runnable;

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_commands(&tmp.path().join("commands.json")).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_records() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("commands.json");
        let records = vec![
            Command::new(
                Runnable::Sequence(vec!["git".to_string(), "status".to_string()]),
                Some("Repository status".to_string()),
                Some("st".to_string()),
                Some("2024-01-01 10:00:00".to_string()),
            ),
            Command::new(Runnable::Single("make -j4".to_string()), None, None, None),
        ];

        save_commands(&path, &records).unwrap();

        assert_eq!(load_commands(&path).unwrap(), records);
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("commands.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_commands(&path), Err(StorageError::Parse { .. })));
    }

    #[test]
    fn test_reported_parse_error_names_its_cause_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("commands.json");
        fs::write(&path, r#"{"command": "ls"}"#).unwrap();

        let err = load_commands(&path).unwrap_err();
        let cause = std::error::Error::source(&err).unwrap().to_string();
        let reported = format!("{}", anyhow::Error::from(err));

        assert_eq!(reported.matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn test_ensure_does_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("commands.json");
        ensure_commands_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");

        fs::write(&path, r#"[{"command": "ls"}]"#).unwrap();
        ensure_commands_file(&path).unwrap();
        assert_eq!(load_commands(&path).unwrap().len(), 1);
    }
}
