// src/cli/handlers/complete.rs

use anyhow::Result;

use crate::{
    cli::dispatcher::{App, program_name},
    core::parser::Parser,
    models::Status,
};

/// Entry point of the completion protocol: `cmd --complete [--] <words...>`.
///
/// Schedules a new run over `<words...>` in completion mode. The words come from
/// the shell, the last one being the word under the cursor.
pub fn handle(app: &mut App<'_>, pars: &mut Parser) -> Result<Status> {
    if let Some(complete) = pars.completion() {
        return Ok(complete.nothing()?);
    }
    if pars.help_enabled() {
        println!("{}", t!("complete.hint"));
        return Ok(Status::Success);
    }

    let mut words = pars.get_rest();
    if words.len() > 1 && words.first().map(String::as_str) == Some("--") {
        words.remove(0);
    }
    // No words at all means completing an empty first word.
    if words.is_empty() {
        words.push(String::new());
    }

    let mut args = vec![program_name(&app.args)];
    args.extend(words);
    app.ctx.completing = true;
    app.schedule_rerun(args);
    Ok(Status::Success)
}
