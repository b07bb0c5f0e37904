// src/core/project.rs

use crate::constants::{COMMANDS_FILENAME, PROJECT_DIR};
use std::path::{Path, PathBuf};

/// A directory holding project-local commands in `.cmd/commands.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// The project root, exported to commands as `CMD_PROJECT_ROOT`.
    pub directory: PathBuf,
    pub commands_file: PathBuf,
}

impl Project {
    pub fn new(directory: PathBuf) -> Self {
        let commands_file = directory.join(PROJECT_DIR).join(COMMANDS_FILENAME);
        Self {
            directory,
            commands_file,
        }
    }

    /// Finds the nearest ancestor of `start` (itself included) containing a `.cmd` directory.
    pub fn detect(start: &Path) -> Option<Self> {
        let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
        let root = start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())?;
        log::debug!("Project root detected at '{}'", root.display());
        Some(Self::new(root.to_path_buf()))
    }
}
