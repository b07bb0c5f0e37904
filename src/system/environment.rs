// src/system/environment.rs

//! Lookups in the user's environment: home directory, shell history and editor.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::DEFAULT_EDITOR;

#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Could not read a command from the shell history '{path}'.")]
    HistoryUnavailable { path: String },
    #[error("Unsupported shell '{shell}', choose bash or zsh.")]
    UnsupportedShell { shell: String },
    #[error("Could not find the home directory.")]
    HomeNotFound,
}

pub fn home_dir() -> Result<PathBuf, EnvironmentError> {
    dirs::home_dir().ok_or(EnvironmentError::HomeNotFound)
}

/// The last command of the history file at `$HOME/<history_home>`.
pub fn last_history_command(history_home: &str) -> Result<String, EnvironmentError> {
    read_last_history_command(&home_dir()?.join(history_home))
}

fn read_last_history_command(path: &Path) -> Result<String, EnvironmentError> {
    let unavailable = || EnvironmentError::HistoryUnavailable {
        path: path.display().to_string(),
    };
    let bytes = fs::read(path).map_err(|_| unavailable())?;
    let content = String::from_utf8_lossy(&bytes);
    content
        .lines()
        .rev()
        .map(strip_extended_history)
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .ok_or_else(unavailable)
}

/// Removes the `: <timestamp>:<duration>;` prefix of zsh extended history lines.
fn strip_extended_history(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(": ")
        && let Some((meta, command)) = rest.split_once(';')
        && meta.chars().all(|c| c.is_ascii_digit() || c == ':')
    {
        return command;
    }
    line
}

/// The editor command line: `$EDITOR` split shell-style, or the default editor.
pub fn editor_command() -> Vec<String> {
    env::var("EDITOR")
        .ok()
        .and_then(|editor| shlex::split(&editor))
        .filter(|parts| !parts.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_EDITOR.to_string()])
}
