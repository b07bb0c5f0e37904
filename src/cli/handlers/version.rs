// src/cli/handlers/version.rs

use anyhow::Result;

use crate::{constants::VERSION, core::parser::Parser, models::Status};

/// Prints `cmd version <semver>`.
pub fn handle(pars: &mut Parser) -> Result<Status> {
    let status = pars.expect_nothing(t!("version.hint"))?;
    if !pars.is_executing() {
        return Ok(status);
    }
    println!("{}", format!(t!("version.output"), version = VERSION));
    Ok(Status::Success)
}
