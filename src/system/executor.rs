// src/system/executor.rs

use crate::{CancellationToken, cli::handlers::commons};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with a non-zero error code.")]
    NonZeroExitStatus { command: String, code: Option<i32> },
    #[error("Operation was cancelled by the user.")]
    Cancelled,
}

/// Runs `argv` as a child process with inherited stdio and waits for it.
///
/// The wait polls the cancellation token; on cancellation the child is killed and
/// [`ExecutionError::Cancelled`] is returned.
pub fn execute(
    argv: &[String],
    cwd: &Path,
    env_vars: &HashMap<String, String>,
    cancellation_token: &CancellationToken,
) -> Result<(), ExecutionError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(ExecutionError::EmptyCommand);
    };
    let command_line = shlex::try_join(argv.iter().map(String::as_str))
        .unwrap_or_else(|_| argv.join(" "));
    let clean_cwd = dunce::simplified(cwd);
    log::debug!("Executing '{}' in '{}'", command_line, clean_cwd.display());

    let mut command = StdCommand::new(program);
    command
        .args(args)
        .current_dir(clean_cwd)
        .envs(env_vars)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    // Built-ins like `echo` only exist inside `cmd.exe` on Windows.
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(&command_line)
                .current_dir(clean_cwd)
                .envs(env_vars)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .spawn()
                .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?
        }
        Err(e) => return Err(ExecutionError::CommandFailed(command_line, e)),
    };

    // Non-blocking wait loop to allow for cancellation.
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    return Err(ExecutionError::NonZeroExitStatus {
                        command: command_line,
                        code: status.code(),
                    });
                }
                return Ok(());
            }
            Ok(None) => {
                if commons::check_for_cancellation(cancellation_token).is_err() {
                    log::debug!(
                        "Cancellation requested, killing child process (PID: {})...",
                        child.id()
                    );
                    if let Err(e) = child.kill() {
                        log::warn!("Failed to kill child process {}: {}", child.id(), e);
                    }
                    child.wait().ok();
                    return Err(ExecutionError::Cancelled);
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(ExecutionError::CommandFailed(command_line, e)),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn token() -> CancellationToken {
        Arc::new(AtomicBool::new(false))
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_runs_in_cwd_with_env() {
        let tmp = tempfile::tempdir().unwrap();
        let mut env = HashMap::new();
        env.insert("CMD_TEST_VALUE".to_string(), "hello".to_string());

        execute(
            &argv(&["sh", "-c", "printf %s \"$CMD_TEST_VALUE\" > out.txt"]),
            tmp.path(),
            &env,
            &token(),
        )
        .unwrap();

        let written = std::fs::read_to_string(tmp.path().join("out.txt")).unwrap();
        assert_eq!(written, "hello");
    }

    #[test]
    fn test_non_zero_exit_keeps_code() {
        let tmp = tempfile::tempdir().unwrap();
        let err = execute(&argv(&["sh", "-c", "exit 3"]), tmp.path(), &HashMap::new(), &token())
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::NonZeroExitStatus { code: Some(3), .. }
        ));
    }

    #[test]
    fn test_empty_and_missing_programs() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            execute(&[], tmp.path(), &HashMap::new(), &token()),
            Err(ExecutionError::EmptyCommand)
        ));
        assert!(matches!(
            execute(
                &argv(&["definitely-not-a-real-program-cmd"]),
                tmp.path(),
                &HashMap::new(),
                &token()
            ),
            Err(ExecutionError::CommandFailed(..))
        ));
    }

    #[test]
    fn test_cancelled_token_kills_child() {
        let tmp = tempfile::tempdir().unwrap();
        let cancelled = Arc::new(AtomicBool::new(true));
        let err = execute(&argv(&["sleep", "5"]), tmp.path(), &HashMap::new(), &cancelled)
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Cancelled));
    }
}
