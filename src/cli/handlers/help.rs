// src/cli/handlers/help.rs

use anyhow::Result;

use crate::{
    cli::dispatcher::{App, Catalog},
    core::{args::ArgumentGroup, parser::Parser},
    models::Status,
};

/// Switches the rest of the run to help mode. Without a further token the
/// general help is printed; otherwise the named command describes itself.
pub fn handle(app: &mut App<'_>, pars: &mut Parser, catalog: &Catalog) -> Result<Status> {
    pars.enable_help();
    if pars.peek().is_none() && !pars.is_completing() {
        print_general_help(catalog)?;
    }
    app.main_command(pars, catalog)
}

fn print_general_help(catalog: &Catalog) -> Result<()> {
    println!("{}", t!("cli.help.usage"));
    println!();
    println!("{}", t!("cli.help.about"));
    println!();
    println!("{}", ArgumentGroup::render(&catalog.help_groups())?);
    println!();
    println!("{}", t!("cli.help.footer"));
    Ok(())
}
