// src/cli/handlers/edit.rs

use anyhow::Result;
use std::collections::HashMap;

use crate::{
    cli::dispatcher::App,
    core::{parser::Parser, storage},
    models::Status,
    system::{environment, executor},
};

/// Opens the commands file of the active scope in `$EDITOR`.
pub fn handle(app: &mut App<'_>, pars: &mut Parser) -> Result<Status> {
    let status = pars.expect_nothing(t!("edit.hint"))?;
    if !pars.is_executing() {
        return Ok(status);
    }

    let file = app.commands_file();
    storage::ensure_commands_file(&file)?;

    let mut argv = environment::editor_command();
    argv.push(file.display().to_string());
    executor::execute(
        &argv,
        &app.ctx.working_directory,
        &HashMap::new(),
        &app.ctx.cancellation_token,
    )?;
    Ok(Status::Success)
}
