//! # Config Loader
//!
//! Loads the user settings from `<config dir>/cmd/config.toml`. Every key is
//! optional; a missing file yields [`Config::default`].

use crate::models::{Scope, Verbosity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Failures reading the settings file. These are hard errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid configuration file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings that are readable but cannot be acted upon. Reported as a warning
/// with status `UserError`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("The configured default command is empty.")]
    EmptyDefaultCommand,
    #[error("The configured default command '{command}' could not be parsed.")]
    UnparsableDefaultCommand { command: String },
    #[error("The default command '{command}' did not resolve to a command.")]
    RepeatedInjection { command: String },
}

/// User settings. Flags given on the command line override them for one run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Shell-style command line used when `cmd` is called without a command.
    pub default_command: Option<String>,
    /// History file, relative to `$HOME`, read by `cmd --save`.
    pub history_home: String,
    /// `chrono` format for the `creation_time` of saved commands.
    pub time_format: String,
    pub verbosity: Verbosity,
    pub scope: Scope,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_command: None,
            history_home: ".bash_history".to_string(),
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            verbosity: Verbosity::default(),
            scope: Scope::default(),
        }
    }
}

impl Config {
    /// Splits `default_command` into tokens.
    ///
    /// Returns `Ok(None)` when no default command is configured.
    pub fn default_command_tokens(&self) -> Result<Option<Vec<String>>, ConfigurationError> {
        let Some(command) = self.default_command.as_deref() else {
            return Ok(None);
        };
        let tokens =
            shlex::split(command).ok_or_else(|| ConfigurationError::UnparsableDefaultCommand {
                command: command.to_string(),
            })?;
        if tokens.is_empty() {
            return Err(ConfigurationError::EmptyDefaultCommand);
        }
        Ok(Some(tokens))
    }
}

/// Reads the settings file at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::trace!("No configuration file at '{}', using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source: e,
            });
        }
    };
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.history_home, ".bash_history");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "default_command = \"status --short\"\nverbosity = \"quiet\"\nscope = \"global\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.verbosity, Verbosity::Quiet);
        assert_eq!(config.scope, Scope::Global);
        assert_eq!(config.time_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(
            config.default_command_tokens().unwrap(),
            Some(vec!["status".to_string(), "--short".to_string()])
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "verbosity = \"loud\"").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_default_command_tokens() {
        let mut config = Config::default();
        assert_eq!(config.default_command_tokens(), Ok(None));

        config.default_command = Some("   ".to_string());
        assert_eq!(
            config.default_command_tokens(),
            Err(ConfigurationError::EmptyDefaultCommand)
        );

        config.default_command = Some("echo 'unterminated".to_string());
        assert!(matches!(
            config.default_command_tokens(),
            Err(ConfigurationError::UnparsableDefaultCommand { .. })
        ));
    }
}
