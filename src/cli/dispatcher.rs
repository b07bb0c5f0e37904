// src/cli/dispatcher.rs

use anyhow::Result;
use log::LevelFilter;
use std::io::{self, Write};

use crate::{
    CancellationToken,
    cli::handlers,
    constants::PROGRAM_NAME,
    core::{
        args::{Argument, ArgumentGroup},
        command::command_arguments,
        complete::CompletionError,
        config_loader::{Config, ConfigurationError},
        parser::{Parser, UsageError},
        storage,
    },
    models::{Command, Scope, Status, Verbosity},
    state::RunContext,
};

/// What a matched top-level token does.
#[derive(Debug, Clone)]
pub enum Action {
    Save,
    Edit,
    Init,
    Version,
    Help,
    Complete,
    Completion,
    Verbosity(Verbosity),
    Scope(Scope),
    /// Run a stored command found by its alias.
    Invoke(Command),
}

/// How a pipeline run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Done(Status),
    /// Resolve again from scratch over a new argument vector.
    Rerun(Vec<String>),
}

/// The argument groups of one pipeline run.
#[derive(Debug)]
pub struct Catalog {
    pub project_commands: ArgumentGroup<Action>,
    pub custom_commands: ArgumentGroup<Action>,
    pub cmd_commands: ArgumentGroup<Action>,
    /// Management commands without the completion plumbing, for the general help.
    pub cmd_shown_commands: ArgumentGroup<Action>,
    pub output_arguments: ArgumentGroup<Action>,
    pub optional_arguments: ArgumentGroup<Action>,
}

impl Catalog {
    pub fn new(ctx: &RunContext) -> Self {
        let project_file = ctx.project.as_ref().map(|p| p.commands_file.clone());
        let mut project_commands = ArgumentGroup::lazy(t!("group.project_commands"), move || {
            let Some(file) = &project_file else {
                return Ok(None);
            };
            let records = storage::load_commands(file)?;
            Ok(Some(command_arguments(records, Action::Invoke)))
        });
        if ctx.project.is_some() {
            project_commands = project_commands.with_empty_help(t!("group.project_commands.empty"));
        }

        let global_file = ctx.global_commands_file.clone();
        let custom_commands = ArgumentGroup::lazy(t!("group.custom_commands"), move || {
            let records = storage::load_commands(&global_file)?;
            Ok(Some(command_arguments(records, Action::Invoke)))
        })
        .with_empty_help(t!("group.custom_commands.empty"));

        let shown = |action: &Action| !matches!(action, Action::Complete | Action::Completion);

        Self {
            project_commands,
            custom_commands,
            cmd_commands: ArgumentGroup::new(t!("group.management_commands"), management_arguments()),
            cmd_shown_commands: ArgumentGroup::new(
                t!("group.management_commands"),
                management_arguments()
                    .into_iter()
                    .filter(|arg| shown(&arg.action))
                    .collect(),
            ),
            output_arguments: ArgumentGroup::new("", output_flags()),
            optional_arguments: ArgumentGroup::new(t!("group.optional_arguments"), {
                let mut flags = output_flags();
                flags.extend(scope_flags());
                flags
            }),
        }
    }

    /// Every group a command token is looked up in, by priority.
    pub fn all_commands(&self) -> [&ArgumentGroup<Action>; 3] {
        [&self.project_commands, &self.custom_commands, &self.cmd_commands]
    }

    /// The groups listed by the general help.
    pub fn help_groups(&self) -> [&ArgumentGroup<Action>; 4] {
        [
            &self.project_commands,
            &self.custom_commands,
            &self.cmd_shown_commands,
            &self.optional_arguments,
        ]
    }
}

/// Entry token of the completion protocol.
pub const COMPLETE_FLAG: &str = "--complete";

fn management_arguments() -> Vec<Argument<Action>> {
    vec![
        Argument::new("--save", Some("-s"), Action::Save, t!("args.save")),
        Argument::new("--edit", Some("-e"), Action::Edit, t!("args.edit")),
        Argument::new("--init", Some("-i"), Action::Init, t!("args.init")),
        Argument::new("--version", Some("-V"), Action::Version, t!("args.version")),
        Argument::new("--help", Some("-h"), Action::Help, t!("args.help")),
        Argument::new(COMPLETE_FLAG, None, Action::Complete, t!("args.complete")),
        Argument::new("--completion", None, Action::Completion, t!("args.completion")),
    ]
}

fn output_flags() -> Vec<Argument<Action>> {
    vec![
        Argument::new("--quiet", Some("-q"), Action::Verbosity(Verbosity::Quiet), t!("args.quiet")),
        Argument::new("--verbose", Some("-v"), Action::Verbosity(Verbosity::Verbose), t!("args.verbose")),
        Argument::new("--debug", Some("-d"), Action::Verbosity(Verbosity::Debug), t!("args.debug")),
    ]
}

fn scope_flags() -> Vec<Argument<Action>> {
    vec![
        Argument::new("--project", Some("-p"), Action::Scope(Scope::Project), t!("args.project")),
        Argument::new("--global", Some("-g"), Action::Scope(Scope::Global), t!("args.global")),
    ]
}

/// State shared by the handlers of one pipeline run.
#[derive(Debug)]
pub struct App<'a> {
    pub ctx: &'a mut RunContext,
    /// This run's copy of the settings; flags change it, never `ctx.settings`.
    pub conf: Config,
    /// The argument vector this run resolves, program name included.
    pub args: Vec<String>,
    rerun: Option<Vec<String>>,
}

impl<'a> App<'a> {
    pub fn new(ctx: &'a mut RunContext, args: Vec<String>) -> Self {
        Self {
            conf: ctx.settings.clone(),
            ctx,
            args,
            rerun: None,
        }
    }

    /// Asks for another pipeline run over `args` once this one returns.
    pub fn schedule_rerun(&mut self, args: Vec<String>) {
        self.rerun = Some(args);
    }

    /// The commands file of the active scope.
    pub fn commands_file(&self) -> std::path::PathBuf {
        match (&self.conf.scope, &self.ctx.project) {
            (Scope::Project | Scope::Automatic, Some(project)) => project.commands_file.clone(),
            _ => self.ctx.global_commands_file.clone(),
        }
    }

    fn start(&mut self, pars: &mut Parser, catalog: &Catalog) -> Result<Flow> {
        let status = pars.load_all(&[&catalog.output_arguments], |p, a| self.apply(p, a, catalog))?;
        if status != Status::Success {
            return Ok(Flow::Done(status));
        }
        self.apply_verbosity(pars);

        log::debug!("Configuration: {:?}", self.conf);
        log::debug!("Working directory: '{}'", self.ctx.working_directory.display());
        log::debug!("Arguments: {:?}", self.args);
        if let Some(root) = self.ctx.project_root() {
            log::debug!("Project root: '{}'", root.display());
        }

        let status = pars.load_all(&[&catalog.optional_arguments], |p, a| {
            self.apply(p, a, catalog)
        })?;
        if status != Status::Success {
            return Ok(Flow::Done(status));
        }
        self.apply_verbosity(pars);

        if self.conf.scope == Scope::Automatic {
            self.conf.scope = match self.ctx.project {
                Some(_) => Scope::Project,
                None => Scope::Global,
            };
        }
        if self.conf.scope == Scope::Project && self.ctx.project.is_none() {
            log::error!("{}", t!("scope.error.no_project"));
            return Ok(Flow::Done(Status::UserError));
        }

        let status = self.main_command(pars, catalog)?;
        Ok(match self.rerun.take() {
            Some(args) => Flow::Rerun(args),
            None => Flow::Done(status),
        })
    }

    fn apply_verbosity(&self, pars: &Parser) {
        let level = if pars.is_completing() {
            LevelFilter::Off
        } else {
            self.conf.verbosity.level_filter()
        };
        log::set_max_level(level);
    }

    /// Runs the command at the head of the stream, or the default command when
    /// there is none.
    pub fn main_command(&mut self, pars: &mut Parser, catalog: &Catalog) -> Result<Status> {
        let current = pars.peek().map(str::to_string);
        log::debug!("Current command: {:?}", current);
        match current {
            Some(command) => self.execute_command(pars, catalog, command),
            None if pars.is_completing() => {
                self.execute_command(pars, catalog, String::new())
            }
            None if pars.help_enabled() => Ok(Status::Success),
            None => self.invoke_default_command(),
        }
    }

    fn execute_command(&mut self, pars: &mut Parser, catalog: &Catalog, current: String) -> Result<Status> {
        // A completion request must not depend on the alias files being readable.
        let groups = if !pars.is_completing() && pars.peek() == Some(COMPLETE_FLAG) {
            vec![&catalog.cmd_commands]
        } else {
            catalog.all_commands().to_vec()
        };
        let matched = pars.may_have(&groups, |p, a| self.apply(p, a, catalog))?;
        match matched {
            Some(status) => Ok(status),
            None if pars.is_completing() => Ok(Status::Success),
            None => Err(UsageError::UnknownCommand { command: current }.into()),
        }
    }

    fn invoke_default_command(&mut self) -> Result<Status> {
        let tokens = self
            .conf
            .default_command_tokens()?
            .ok_or(UsageError::NoCommand)?;
        if self.ctx.default_injected {
            return Err(ConfigurationError::RepeatedInjection {
                command: self.conf.default_command.clone().unwrap_or_default(),
            }
            .into());
        }
        self.ctx.default_injected = true;
        log::debug!("Applying default arguments {:?}", tokens);

        let mut args = self.args.clone();
        args.extend(tokens);
        self.schedule_rerun(args);
        Ok(Status::Success)
    }

    /// Carries out one matched action.
    pub fn apply(&mut self, pars: &mut Parser, action: &Action, catalog: &Catalog) -> Result<Status> {
        log::trace!("Applying {:?}", action);
        match action {
            Action::Verbosity(verbosity) => {
                self.conf.verbosity = *verbosity;
                Ok(Status::Success)
            }
            Action::Scope(scope) => {
                self.conf.scope = *scope;
                Ok(Status::Success)
            }
            Action::Save => handlers::save::handle(self, pars),
            Action::Edit => handlers::edit::handle(self, pars),
            Action::Init => handlers::init::handle(self, pars),
            Action::Version => handlers::version::handle(pars),
            Action::Help => handlers::help::handle(self, pars, catalog),
            Action::Complete => handlers::complete::handle(self, pars),
            Action::Completion => handlers::completion::handle(self, pars),
            Action::Invoke(command) => handlers::invoke::handle(self, pars, command),
        }
    }
}

/// One pipeline run: a fresh parser and fresh groups over `args`.
fn pipeline(ctx: &mut RunContext, args: Vec<String>) -> Result<Flow> {
    ctx.pipeline_runs += 1;
    log::trace!("Pipeline run {} over {:?}", ctx.pipeline_runs, args);

    let catalog = Catalog::new(ctx);
    let mut pars = Parser::new(args.clone());
    pars.remove_first_argument();
    if ctx.completing {
        match ctx.completion.take() {
            Some(complete) => pars.resume_completion(complete),
            None => pars.enable_completion(),
        }
    }

    let mut app = App::new(ctx, args);
    let result = app.start(&mut pars, &catalog);
    if let Some(complete) = pars.take_completion() {
        app.ctx.completion = Some(complete);
    }
    result
}

/// Resolves `args` (program name first) until no further run is requested.
///
/// Usage and configuration mistakes are logged here and become
/// [`Status::UserError`]; everything else is returned to the caller.
pub fn run_with(ctx: &mut RunContext, args: Vec<String>) -> Result<Status> {
    let mut args = args;
    loop {
        match pipeline(ctx, args) {
            Ok(Flow::Done(status)) => return Ok(status),
            Ok(Flow::Rerun(next)) => {
                log::debug!("Running again with {:?}", next);
                args = next;
            }
            Err(e) => return report(e),
        }
    }
}

fn report(e: anyhow::Error) -> Result<Status> {
    if let Some(usage) = e.downcast_ref::<UsageError>() {
        log::warn!("{}", usage);
        if let Some(hint) = usage.hint() {
            log::info!("{}", hint);
        }
        return Ok(Status::UserError);
    }
    if let Some(configuration) = e.downcast_ref::<ConfigurationError>() {
        log::warn!("{}", configuration);
        return Ok(Status::UserError);
    }
    Err(e)
}

/// Entry point of the binary: builds the context from the environment, resolves
/// `args` and, when completing, prints the candidate words.
pub fn run(args: Vec<String>, cancellation_token: CancellationToken) -> Result<Status> {
    let mut ctx = RunContext::from_environment(cancellation_token)?;
    let result = run_with(&mut ctx, args);
    conclude(&ctx, result, &mut io::stdout().lock())
}

/// Outside completion `result` is handed back untouched. A completion request
/// always writes its single line of words to `out`; only accumulator defects
/// are reported.
fn conclude<W: Write>(ctx: &RunContext, result: Result<Status>, out: &mut W) -> Result<Status> {
    if !ctx.completing {
        return result;
    }

    if let Err(e) = result {
        if e.downcast_ref::<CompletionError>().is_some() {
            return Err(e);
        }
        log::trace!("Ignoring error while completing: {}", e);
    }
    let words = ctx
        .completion
        .as_ref()
        .map(|complete| complete.render())
        .unwrap_or_default();
    writeln!(out, "{}", words)?;
    Ok(Status::Success)
}

/// The name the program was invoked by, for rebuilding argument vectors.
pub fn program_name(args: &[String]) -> String {
    args.first().cloned().unwrap_or_else(|| PROGRAM_NAME.to_string())
}
