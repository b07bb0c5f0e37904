// src/cli/handlers/invoke.rs

use anyhow::Result;
use std::collections::HashMap;

use crate::{
    cli::dispatcher::App,
    constants::PROJECT_ROOT_VAR,
    core::parser::Parser,
    models::{Command, Status},
    system::executor,
};

/// Runs a stored command. Everything typed after its alias is passed along.
pub fn handle(app: &mut App<'_>, pars: &mut Parser, command: &Command) -> Result<Status> {
    let extra = pars.get_rest();
    if let Some(complete) = pars.completion() {
        return Ok(complete.nothing()?);
    }
    if pars.help_enabled() {
        println!("{}", describe(command));
        return Ok(Status::Success);
    }

    let project_root = app.ctx.project_root();
    let argv = command.argv(project_root, &extra)?;

    let mut env_vars = HashMap::new();
    if let Some(root) = project_root {
        env_vars.insert(PROJECT_ROOT_VAR.to_string(), root.display().to_string());
    }
    executor::execute(
        &argv,
        &app.ctx.working_directory,
        &env_vars,
        &app.ctx.cancellation_token,
    )?;
    Ok(Status::Success)
}

/// The help text of an alias: what it runs.
fn describe(command: &Command) -> String {
    format!(t!("invoke.help"), command = command.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Runnable;

    #[test]
    fn test_describe_shows_stored_command() {
        let single = Command::new(Runnable::Single("git status -s".into()), None, Some("st".into()), None);
        assert_eq!(describe(&single), "Runs: git status -s");

        let sequence = Command::new(
            Runnable::Sequence(vec!["echo".into(), "hi".into()]),
            None,
            Some("hi".into()),
            None,
        );
        assert_eq!(describe(&sequence), "Runs: echo hi");
    }
}
