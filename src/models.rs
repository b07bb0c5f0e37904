// src/models.rs

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- STORED COMMAND MODELS (FOR commands.json) ---

/// The payload of a stored command. Uses `untagged` so both a plain string and a
/// list of arguments are accepted in the JSON file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Runnable {
    /// A direct argument vector, e.g. `["ls", "-la"]`.
    Sequence(Vec<String>),
    /// A command line tokenized shell-style before execution.
    Single(String),
}

impl fmt::Display for Runnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(line) => f.write_str(line),
            Self::Sequence(parts) => {
                let joined = shlex::try_join(parts.iter().map(String::as_str))
                    .unwrap_or_else(|_| parts.join(" "));
                f.write_str(&joined)
            }
        }
    }
}

/// A single record of a command collection file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// What gets executed.
    pub command: Runnable,
    /// Short human description shown in help listings.
    #[serde(default)]
    pub description: Option<String>,
    /// One word shortcut the command is invoked by.
    #[serde(default)]
    pub alias: Option<String>,
    /// Timestamp of `cmd --save`, formatted with the configured `time_format`.
    #[serde(default)]
    pub creation_time: Option<String>,
}

impl Command {
    /// Creates a record, treating empty description and alias as absent.
    pub fn new(
        command: Runnable,
        description: Option<String>,
        alias: Option<String>,
        creation_time: Option<String>,
    ) -> Self {
        Self {
            command,
            description: non_empty(description),
            alias: non_empty(alias),
            creation_time,
        }
    }

    /// Re-applies the empty-string normalization to a deserialized record.
    pub fn normalized(self) -> Self {
        Self::new(
            self.command,
            self.description,
            self.alias,
            self.creation_time,
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// --- RUNTIME SETTINGS ---

/// Which command collection the invocation reads from and writes to.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Project scope when a project root is detected, global otherwise.
    #[default]
    Automatic,
    /// The `.cmd/commands.json` of the detected project.
    Project,
    /// The user's global collection.
    Global,
}

/// How much is logged. Set by `--quiet`, `--verbose` and `--debug`, last one wins.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and informational messages.
    #[default]
    Normal,
    /// Adds debug messages.
    Verbose,
    /// Everything, including the resolver's trace output.
    Debug,
}

impl Verbosity {
    /// The `log` filter this verbosity maps to.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Normal => LevelFilter::Info,
            Self::Verbose => LevelFilter::Debug,
            Self::Debug => LevelFilter::Trace,
        }
    }
}

/// Outcome of a handler or of a whole invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The requested operation completed.
    Success,
    /// The invocation was wrong (unknown command, bad arguments, missing project...).
    UserError,
}

impl Status {
    /// The process exit code for this status.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::UserError => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runnable_accepts_string_and_list() {
        let records: Vec<Command> = serde_json::from_str(
            r#"[
                {"command": "git status --short", "alias": "st"},
                {"command": ["ls", "-la"], "description": "", "alias": ""}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            records[0].command,
            Runnable::Single("git status --short".to_string())
        );
        assert_eq!(
            records[1].command,
            Runnable::Sequence(vec!["ls".to_string(), "-la".to_string()])
        );
        let second = records[1].clone().normalized();
        assert!(second.alias.is_none());
        assert!(second.description.is_none());
    }

    #[test]
    fn test_runnable_display_quotes_sequence() {
        let seq = Runnable::Sequence(vec!["echo".to_string(), "hello world".to_string()]);
        assert_eq!(seq.to_string(), "echo 'hello world'");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Verbosity::Quiet.level_filter(), LevelFilter::Error);
        assert_eq!(Verbosity::default().level_filter(), LevelFilter::Info);
        assert_eq!(Verbosity::Debug.level_filter(), LevelFilter::Trace);
    }
}
