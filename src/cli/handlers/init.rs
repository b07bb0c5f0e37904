// src/cli/handlers/init.rs

use anyhow::Result;

use crate::{
    cli::dispatcher::App,
    constants::{COMMANDS_FILENAME, PROJECT_DIR},
    core::{parser::Parser, storage},
    models::Status,
};

/// The handler for `cmd --init`.
/// Makes the working directory a project root with an empty command collection.
pub fn handle(app: &mut App<'_>, pars: &mut Parser) -> Result<Status> {
    let status = pars.expect_nothing(t!("init.hint"))?;
    if !pars.is_executing() {
        return Ok(status);
    }

    let target_dir = app.ctx.working_directory.clone();
    let project_dir = target_dir.join(PROJECT_DIR);
    if project_dir.exists() {
        log::error!(
            "{}",
            format!(t!("init.error.already_initialized"), path = target_dir.display())
        );
        return Ok(Status::Success);
    }

    let commands_file = project_dir.join(COMMANDS_FILENAME);
    storage::ensure_commands_file(&commands_file)?;
    log::info!(
        "{}",
        format!(t!("init.success"), path = commands_file.display())
    );
    Ok(Status::Success)
}
