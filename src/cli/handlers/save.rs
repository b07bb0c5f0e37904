// src/cli/handlers/save.rs

use anyhow::{Result, anyhow};
use std::fmt::Write as _;
use std::path::Path;

use super::commons;
use crate::{
    cli::dispatcher::App,
    constants::PROJECT_ROOT_VAR,
    core::{
        args::{Argument, ArgumentGroup},
        parser::{Parser, UsageError},
        storage,
    },
    models::{Command, Runnable, Scope, Status},
    system::{environment, executor::ExecutionError},
};

/// The sub-arguments `cmd --save` accepts.
#[derive(Debug, Clone, Copy)]
enum SaveField {
    Alias,
    Description,
    Command,
}

/// What the user supplied on the command line. Missing parts are asked for.
#[derive(Debug, Default)]
struct SaveRequest {
    alias: Option<String>,
    description: Option<String>,
    command: Option<Vec<String>>,
}

impl SaveRequest {
    fn apply(&mut self, pars: &mut Parser, field: SaveField) -> Result<Status> {
        match field {
            SaveField::Alias => self.alias = Some(flag_value(pars, "--alias")?),
            SaveField::Description => self.description = Some(flag_value(pars, "--descr")?),
            SaveField::Command => {
                self.command = Some(pars.get_rest());
                close_completion(pars)?;
            }
        }
        Ok(Status::Success)
    }
}

/// The token after a flag. While completing, a value being typed has no candidates.
fn flag_value(pars: &mut Parser, flag: &str) -> Result<String> {
    if pars.is_completing() && pars.remaining() <= 1 {
        close_completion(pars)?;
    }
    match pars.shift() {
        Some(value) => Ok(value),
        None if !pars.is_executing() => Ok(String::new()),
        None => Err(UsageError::MissingValue {
            flag: flag.to_string(),
        }
        .into()),
    }
}

fn close_completion(pars: &mut Parser) -> Result<()> {
    if let Some(complete) = pars.completion()
        && !complete.is_closed()
    {
        complete.nothing()?;
    }
    Ok(())
}

fn save_arguments() -> ArgumentGroup<SaveField> {
    ArgumentGroup::new(
        t!("group.save_arguments"),
        vec![
            Argument::new("--alias", Some("-a"), SaveField::Alias, t!("args.save.alias")),
            Argument::new("--descr", Some("-d"), SaveField::Description, t!("args.save.descr")),
            Argument::new("--", None, SaveField::Command, t!("args.save.command")),
        ],
    )
}

/// The handler for `cmd --save`.
/// Records a command in the collection of the active scope.
pub fn handle(app: &mut App<'_>, pars: &mut Parser) -> Result<Status> {
    let group = save_arguments();
    let mut request = SaveRequest::default();
    let status = pars.load_all(&[&group], |p, field| request.apply(p, *field))?;
    if status != Status::Success || !pars.is_executing() {
        return Ok(status);
    }
    pars.expect_nothing(t!("save.hint"))?;

    let token = app.ctx.cancellation_token.clone();

    // 1. The command itself, from the arguments, a prompt or the shell history.
    let mut show_edit = false;
    let mut tokens = match request.command {
        Some(tokens) if !tokens.is_empty() => tokens,
        _ => {
            let answer = commons::prompt_text(t!("save.prompt.command"), &token)?;
            shlex::split(&answer).ok_or(ExecutionError::CommandParse(answer))?
        }
    };
    if tokens.is_empty() {
        let last = environment::last_history_command(&app.conf.history_home)?;
        tokens = shlex::split(&last).unwrap_or_else(|| vec![last.clone()]);
        show_edit = true;
    }
    if let Some(first) = tokens.first_mut()
        && let Some(rewritten) = rewrite_path(
            first,
            &app.ctx.working_directory,
            app.conf.scope,
            app.ctx.project_root(),
        )
    {
        *first = rewritten;
        show_edit = true;
    }

    let runnable = if show_edit {
        let line = shlex::try_join(tokens.iter().map(String::as_str))
            .unwrap_or_else(|_| tokens.join(" "));
        let edited = commons::prompt_prefilled(t!("save.prompt.edit"), &line, &token)?;
        if edited.is_empty() {
            return Err(ExecutionError::EmptyCommand.into());
        }
        Runnable::Single(edited)
    } else {
        let runnable = Runnable::Sequence(tokens);
        println!("{}", format!(t!("save.info.saving"), command = runnable));
        runnable
    };

    // 2. Alias and description.
    let alias = match request.alias {
        Some(alias) => alias,
        None => commons::prompt_text(t!("save.prompt.alias"), &token)?,
    };
    if alias.chars().any(char::is_whitespace) {
        return Err(UsageError::InvalidAlias { alias }.into());
    }
    let description = match request.description {
        Some(description) => description,
        None => commons::prompt_text(t!("save.prompt.description"), &token)?,
    };

    let mut creation_time = String::new();
    write!(
        creation_time,
        "{}",
        chrono::Local::now().format(&app.conf.time_format)
    )
    .map_err(|_| anyhow!("Invalid time format '{}'.", app.conf.time_format))?;

    // 3. Append to the collection of the active scope.
    let file = app.commands_file();
    let mut records = storage::load_commands(&file)?;
    if !alias.is_empty() && records.iter().any(|r| r.alias.as_deref() == Some(alias.as_str())) {
        log::warn!("{}", format!(t!("save.warning.duplicate_alias"), alias = alias));
    }
    records.push(Command::new(
        runnable,
        Some(description),
        Some(alias),
        Some(creation_time),
    ));
    storage::save_commands(&file, &records)?;
    log::debug!("Command saved to '{}'", file.display());
    Ok(Status::Success)
}

/// Rewrites a first token naming an existing file: relative to the project root
/// in project scope, absolute otherwise.
fn rewrite_path(
    token: &str,
    working_directory: &Path,
    scope: Scope,
    project_root: Option<&Path>,
) -> Option<String> {
    let candidate = working_directory.join(token);
    if !candidate.exists() {
        return None;
    }
    let absolute = dunce::canonicalize(&candidate).unwrap_or(candidate);
    if scope == Scope::Project
        && let Some(root) = project_root
        && let Ok(relative) = absolute.strip_prefix(root)
    {
        return Some(format!("${}/{}", PROJECT_ROOT_VAR, relative.display()));
    }
    Some(absolute.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_rewrite_path_per_scope() {
        let tmp = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(tmp.path()).unwrap();
        let scripts = root.join("scripts");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("deploy.sh"), "").unwrap();

        assert_eq!(
            rewrite_path("deploy.sh", &scripts, Scope::Project, Some(&root)),
            Some("$CMD_PROJECT_ROOT/scripts/deploy.sh".to_string())
        );
        assert_eq!(
            rewrite_path("./deploy.sh", &scripts, Scope::Global, Some(&root)),
            Some(scripts.join("deploy.sh").display().to_string())
        );
        assert_eq!(rewrite_path("missing.sh", &scripts, Scope::Global, None), None);
    }

    #[test]
    fn test_save_arguments_collect_fields() {
        let group = save_arguments();
        let mut pars = Parser::new(["-a", "st", "--descr", "Status", "--", "git", "status"]);
        let mut request = SaveRequest::default();

        let status = pars
            .load_all(&[&group], |p, field| request.apply(p, *field))
            .unwrap();

        assert_eq!(status, Status::Success);
        assert_eq!(request.alias.as_deref(), Some("st"));
        assert_eq!(request.description.as_deref(), Some("Status"));
        assert_eq!(
            request.command,
            Some(vec!["git".to_string(), "status".to_string()])
        );
        assert_eq!(pars.remaining(), 0);
    }

    #[test]
    fn test_flag_without_value() {
        let group = save_arguments();
        let mut pars = Parser::new(["--alias"]);
        let mut request = SaveRequest::default();

        let err = pars
            .load_all(&[&group], |p, field| request.apply(p, *field))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UsageError>(),
            Some(UsageError::MissingValue { .. })
        ));
    }
}
