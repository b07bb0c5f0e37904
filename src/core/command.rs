// src/core/command.rs

//! Turns stored command records into invocable arguments.

use crate::constants::PROJECT_ROOT_VAR;
use crate::core::args::Argument;
use crate::models::{Command, Runnable};
use crate::system::executor::ExecutionError;
use std::path::Path;

/// Wraps every record that has an alias into an [`Argument`] named after the alias.
///
/// Records without an alias are stored but cannot be invoked, so they are skipped.
pub fn command_arguments<A>(records: Vec<Command>, wrap: impl Fn(Command) -> A) -> Vec<Argument<A>> {
    records
        .into_iter()
        .filter_map(|record| {
            let alias = record.alias.clone()?;
            let description = record
                .description
                .clone()
                .unwrap_or_else(|| record.command.to_string());
            Some(Argument::new(alias, None, wrap(record), description))
        })
        .collect()
}

impl Command {
    /// Builds the argument vector to execute.
    ///
    /// A string payload is split shell-style. `$CMD_PROJECT_ROOT` is replaced by
    /// `project_root` when there is one. `extra` is appended as typed.
    pub fn argv(
        &self,
        project_root: Option<&Path>,
        extra: &[String],
    ) -> Result<Vec<String>, ExecutionError> {
        let tokens = match &self.command {
            Runnable::Sequence(parts) => parts.clone(),
            Runnable::Single(line) => {
                shlex::split(line).ok_or_else(|| ExecutionError::CommandParse(line.clone()))?
            }
        };
        if tokens.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        let root = project_root.map(|p| p.display().to_string());
        let mut argv: Vec<String> = tokens
            .iter()
            .map(|token| {
                shellexpand::env_with_context_no_errors(token, |var| {
                    if var == PROJECT_ROOT_VAR {
                        root.as_deref()
                    } else {
                        None
                    }
                })
                .into_owned()
            })
            .collect();
        argv.extend(extra.iter().cloned());
        Ok(argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(command: Runnable, alias: Option<&str>, description: Option<&str>) -> Command {
        Command::new(
            command,
            description.map(str::to_string),
            alias.map(str::to_string),
            None,
        )
    }

    #[test]
    fn test_only_aliased_records_become_arguments() {
        let records = vec![
            record(Runnable::Single("git status".into()), Some("st"), None),
            record(Runnable::Single("make".into()), None, Some("Build")),
            record(
                Runnable::Sequence(vec!["cargo".into(), "test".into()]),
                Some("t"),
                Some("Run the tests"),
            ),
        ];

        let args = command_arguments(records, |c| c);

        assert_eq!(args.len(), 2);
        assert_eq!(args[0].long, "st");
        assert_eq!(args[0].description, "git status");
        assert!(args[0].short.is_none());
        assert_eq!(args[1].long, "t");
        assert_eq!(args[1].description, "Run the tests");
    }

    #[test]
    fn test_argv_substitutes_project_root() {
        let cmd = record(
            Runnable::Single("\"$CMD_PROJECT_ROOT/scripts/run.sh\" ${CMD_PROJECT_ROOT} $HOME".into()),
            Some("run"),
            None,
        );
        let argv = cmd
            .argv(Some(Path::new("/work/app")), &["--fast".to_string()])
            .unwrap();
        assert_eq!(
            argv,
            vec!["/work/app/scripts/run.sh", "/work/app", "$HOME", "--fast"]
        );
    }

    #[test]
    fn test_argv_without_project_keeps_placeholder() {
        let cmd = record(
            Runnable::Sequence(vec!["ls".into(), "$CMD_PROJECT_ROOT".into()]),
            Some("l"),
            None,
        );
        assert_eq!(cmd.argv(None, &[]).unwrap(), vec!["ls", "$CMD_PROJECT_ROOT"]);
    }

    #[test]
    fn test_argv_errors() {
        let empty = record(Runnable::Single("   ".into()), Some("e"), None);
        assert!(matches!(empty.argv(None, &[]), Err(ExecutionError::EmptyCommand)));

        let broken = record(Runnable::Single("echo 'open".into()), Some("b"), None);
        assert!(matches!(
            broken.argv(None, &[]),
            Err(ExecutionError::CommandParse(_))
        ));
    }
}
