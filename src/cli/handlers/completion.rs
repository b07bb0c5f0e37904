// src/cli/handlers/completion.rs

use anyhow::Result;

use crate::{
    cli::{args::Shell, dispatcher::App},
    core::parser::{Parser, UsageError},
    models::Status,
    system::{completion, environment::EnvironmentError},
};

/// Prints the line to add to the shell's rc file to enable completion:
/// `source <setup script> cmd`.
pub fn handle(app: &mut App<'_>, pars: &mut Parser) -> Result<Status> {
    if pars.is_completing() {
        let partial_shell = pars.remaining() == 1;
        if let Some(complete) = pars.completion() {
            return Ok(if partial_shell {
                complete.commands([Shell::names()])?
            } else {
                complete.nothing()?
            });
        }
    }
    if pars.help_enabled() {
        println!("{}", t!("completion.hint"));
        return Ok(Status::Success);
    }

    let name = pars.shift().ok_or_else(|| UsageError::MissingValue {
        flag: "--completion".to_string(),
    })?;
    pars.expect_nothing(t!("completion.hint"))?;
    let shell = Shell::parse(&name).ok_or(EnvironmentError::UnsupportedShell { shell: name })?;

    let script = completion::install_setup_script(shell, &app.ctx.config_dir)?;
    println!("{}", format!(t!("completion.output"), path = script.display()));
    Ok(Status::Success)
}
