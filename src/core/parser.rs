// src/core/parser.rs

//! The token stream walker shared by the execute, help and complete modes.

use anyhow::Result;
use std::collections::VecDeque;
use thiserror::Error;

use crate::core::args::{Argument, ArgumentGroup};
use crate::core::complete::Complete;
use crate::models::Status;

/// Mistakes in the invocation itself. Reported as a warning with status `UserError`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("Unexpected arguments: {}", .arguments.join(" "))]
    UnexpectedArguments { arguments: Vec<String> },
    #[error("Missing value for '{flag}'.")]
    MissingValue { flag: String },
    #[error("Unknown command '{command}'.")]
    UnknownCommand { command: String },
    #[error("No command was given and no default command is configured.")]
    NoCommand,
    #[error("Invalid alias '{alias}': an alias cannot contain whitespace.")]
    InvalidAlias { alias: String },
}

impl UsageError {
    /// A follow-up suggestion logged after the warning, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownCommand { .. } | Self::NoCommand => Some(t!("usage.hint.list_commands")),
            Self::UnexpectedArguments { .. } | Self::MissingValue { .. } => {
                Some(t!("usage.hint.command_help"))
            }
            Self::InvalidAlias { .. } => None,
        }
    }
}

/// Walks the remaining arguments of one pipeline run.
///
/// The same walk serves three modes. When executing, matched actions are applied.
/// In help mode groups and actions describe themselves instead. When completing,
/// the word being typed is never applied; every name that could appear in its
/// place is fed to the [`Complete`] accumulator.
#[derive(Debug)]
pub struct Parser {
    args: VecDeque<String>,
    last_arg: String,
    help: bool,
    complete: Option<Complete>,
}

impl Parser {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: VecDeque<String> = args.into_iter().map(Into::into).collect();
        let last_arg = args.back().cloned().unwrap_or_default();
        Self {
            args,
            last_arg,
            help: false,
            complete: None,
        }
    }

    // --- Token stream ---

    pub fn peek(&self) -> Option<&str> {
        self.args.front().map(String::as_str)
    }

    pub fn shift(&mut self) -> Option<String> {
        self.args.pop_front()
    }

    /// Drops the head of the stream, normally the program name.
    pub fn remove_first_argument(&mut self) {
        self.args.pop_front();
    }

    /// Consumes every remaining token.
    pub fn get_rest(&mut self) -> Vec<String> {
        self.args.drain(..).collect()
    }

    pub fn remaining(&self) -> usize {
        self.args.len()
    }

    // --- Modes ---

    pub fn enable_help(&mut self) {
        self.help = true;
    }

    pub fn help_enabled(&self) -> bool {
        self.help
    }

    /// Starts collecting completion words for the last token of the original input.
    pub fn enable_completion(&mut self) {
        self.complete = Some(Complete::new(self.last_arg.clone()));
    }

    /// Continues a completion started by an earlier pipeline run.
    pub fn resume_completion(&mut self, complete: Complete) {
        self.complete = Some(complete);
    }

    pub fn take_completion(&mut self) -> Option<Complete> {
        self.complete.take()
    }

    pub fn completion(&mut self) -> Option<&mut Complete> {
        self.complete.as_mut()
    }

    pub fn is_completing(&self) -> bool {
        self.complete.is_some()
    }

    /// Neither help nor completion: matched actions really run.
    pub fn is_executing(&self) -> bool {
        !self.help && self.complete.is_none()
    }

    // --- Matching ---

    /// Applies matching actions until the head of the stream no longer matches
    /// any member of `groups`, or an action reports a non-success status.
    ///
    /// In help mode nothing is consumed; the groups are printed instead.
    pub fn load_all<A, F>(&mut self, groups: &[&ArgumentGroup<A>], mut apply: F) -> Result<Status>
    where
        F: FnMut(&mut Self, &A) -> Result<Status>,
    {
        if self.help && !self.is_completing() {
            let text = ArgumentGroup::render(groups)?;
            if !text.is_empty() {
                println!("{}", text);
            }
            return Ok(Status::Success);
        }

        while let Some(status) = self.step(groups, &mut apply)? {
            if status != Status::Success {
                return Ok(status);
            }
        }
        Ok(Status::Success)
    }

    /// A single matching step. Returns the action's status, or `None` when the
    /// head matched nothing.
    pub fn may_have<A, F>(
        &mut self,
        groups: &[&ArgumentGroup<A>],
        mut apply: F,
    ) -> Result<Option<Status>>
    where
        F: FnMut(&mut Self, &A) -> Result<Status>,
    {
        self.step(groups, &mut apply)
    }

    fn step<A, F>(&mut self, groups: &[&ArgumentGroup<A>], apply: &mut F) -> Result<Option<Status>>
    where
        F: FnMut(&mut Self, &A) -> Result<Status>,
    {
        // While completing, the only remaining token is the one being typed.
        if self.is_completing() && self.args.len() <= 1 {
            self.offer(groups)?;
            return Ok(None);
        }

        let Some(head) = self.args.front().cloned() else {
            return Ok(None);
        };

        for group in groups {
            if let Some(argument) = self.members(group)?.iter().find(|arg| arg.matches(&head)) {
                self.args.pop_front();
                log::trace!("Matched '{}' in group '{}'", head, group.title());
                if self.help && !self.is_completing() {
                    println!("{}", argument.help_line(0));
                }
                return apply(self, &argument.action).map(Some);
            }
        }
        Ok(None)
    }

    /// The members of `group`. A completion request never fails on a group that
    /// cannot be loaded, such as a corrupt commands file; it just offers nothing.
    fn members<'g, A>(&self, group: &'g ArgumentGroup<A>) -> Result<&'g [Argument<A>]> {
        match group.arguments() {
            Err(e) if self.is_completing() => {
                log::debug!("Skipping group '{}' while completing: {}", group.title(), e);
                Ok(&[])
            }
            members => members,
        }
    }

    fn offer<A>(&mut self, groups: &[&ArgumentGroup<A>]) -> Result<()> {
        for group in groups {
            let names = self
                .members(group)?
                .iter()
                .flat_map(Argument::names)
                .collect::<Vec<_>>();
            if let Some(complete) = self.complete.as_mut() {
                complete.add_words(names)?;
            }
        }
        Ok(())
    }

    /// Asserts the stream is exhausted.
    ///
    /// Completing closes the accumulator with nothing to offer, help prints `hint`,
    /// and executing with tokens left fails with [`UsageError::UnexpectedArguments`].
    pub fn expect_nothing(&mut self, hint: &str) -> Result<Status> {
        if let Some(complete) = self.complete.as_mut() {
            return Ok(complete.nothing()?);
        }
        if self.help {
            println!("{}", hint);
            return Ok(Status::Success);
        }
        if !self.args.is_empty() {
            return Err(UsageError::UnexpectedArguments {
                arguments: self.args.iter().cloned().collect(),
            }
            .into());
        }
        Ok(Status::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Flag {
        Verbose,
        Quiet,
        Version,
    }

    fn output_group() -> ArgumentGroup<Flag> {
        ArgumentGroup::new(
            "",
            vec![
                Argument::new("--verbose", Some("-v"), Flag::Verbose, "More output"),
                Argument::new("--quiet", Some("-q"), Flag::Quiet, "Less output"),
            ],
        )
    }

    fn command_group() -> ArgumentGroup<Flag> {
        ArgumentGroup::new(
            "management commands",
            vec![Argument::new("--version", Some("-V"), Flag::Version, "Show version")],
        )
    }

    fn record(applied: &mut Vec<Flag>) -> impl FnMut(&mut Parser, &Flag) -> Result<Status> + '_ {
        move |_, flag| {
            applied.push(*flag);
            Ok(Status::Success)
        }
    }

    #[test]
    fn test_load_all_drains_matching_flags() {
        let group = output_group();
        let mut parser = Parser::new(["-v", "--quiet", "-v", "status", "-q"]);
        let mut applied = Vec::new();

        let status = parser.load_all(&[&group], record(&mut applied)).unwrap();

        assert_eq!(status, Status::Success);
        assert_eq!(applied, vec![Flag::Verbose, Flag::Quiet, Flag::Verbose]);
        assert_eq!(parser.peek(), Some("status"));
        assert_eq!(parser.remaining(), 2);
    }

    #[test]
    fn test_single_match_consumes_exactly_one_token() {
        let group = output_group();
        for form in ["--verbose", "-v"] {
            let mut parser = Parser::new([form, "build"]);
            let mut applied = Vec::new();
            parser.load_all(&[&group], record(&mut applied)).unwrap();
            assert_eq!(applied, vec![Flag::Verbose]);
            assert_eq!(parser.get_rest(), vec!["build".to_string()]);
        }
    }

    #[test]
    fn test_non_success_status_stops_the_drain() {
        let group = output_group();
        let mut parser = Parser::new(["-v", "-q"]);
        let status = parser
            .load_all(&[&group], |_, _| Ok(Status::UserError))
            .unwrap();
        assert_eq!(status, Status::UserError);
        assert_eq!(parser.peek(), Some("-q"));
    }

    #[test]
    fn test_empty_stream_in_completion_feeds_every_name() {
        let output = output_group();
        let aliases = ArgumentGroup::new(
            "custom commands",
            vec![
                Argument::new("build", None, Flag::Version, "Build"),
                Argument::new("deploy", None, Flag::Version, "Deploy"),
            ],
        );
        let mut parser = Parser::new(Vec::<String>::new());
        parser.enable_completion();
        let mut applied = Vec::new();

        let status = parser
            .load_all(&[&output, &aliases], record(&mut applied))
            .unwrap();

        assert_eq!(status, Status::Success);
        assert!(applied.is_empty());
        // The empty prefix hides the flags that were fed alongside.
        assert_eq!(
            parser.take_completion().unwrap().words(),
            vec!["build", "deploy"]
        );
    }

    #[test]
    fn test_partial_token_is_never_applied() {
        let output = output_group();
        let commands = command_group();
        let mut parser = Parser::new(["--v"]);
        parser.enable_completion();
        let mut applied = Vec::new();

        parser.load_all(&[&output], record(&mut applied)).unwrap();
        let matched = parser.may_have(&[&commands], record(&mut applied)).unwrap();

        assert!(matched.is_none());
        assert!(applied.is_empty());
        assert_eq!(parser.take_completion().unwrap().render(), "--verbose --version");

        // An exact match that is still being typed is offered, not applied.
        let mut parser = Parser::new(["-v"]);
        parser.enable_completion();
        parser.load_all(&[&output], record(&mut applied)).unwrap();
        assert!(applied.is_empty());
        assert_eq!(parser.remaining(), 1);
    }

    #[test]
    fn test_completion_applies_earlier_tokens() {
        let output = output_group();
        let mut parser = Parser::new(["-q", "-"]);
        parser.enable_completion();
        let mut applied = Vec::new();

        parser.load_all(&[&output], record(&mut applied)).unwrap();

        assert_eq!(applied, vec![Flag::Quiet]);
        assert_eq!(
            parser.take_completion().unwrap().words(),
            vec!["--verbose", "-v", "--quiet", "-q"]
        );
    }

    #[test]
    fn test_may_have_is_a_single_step() {
        let output = output_group();
        let mut parser = Parser::new(["-v", "-q"]);
        let mut applied = Vec::new();

        let first = parser.may_have(&[&output], record(&mut applied)).unwrap();
        assert_eq!(first, Some(Status::Success));
        assert_eq!(parser.remaining(), 1);

        let mut parser = Parser::new(["nope"]);
        assert_eq!(parser.may_have(&[&output], record(&mut applied)).unwrap(), None);
        assert_eq!(parser.peek(), Some("nope"));
    }

    #[test]
    fn test_help_mode_does_not_consume_in_load_all() {
        let output = output_group();
        let mut parser = Parser::new(["-v"]);
        parser.enable_help();
        let mut applied = Vec::new();

        parser.load_all(&[&output], record(&mut applied)).unwrap();

        assert!(applied.is_empty());
        assert_eq!(parser.remaining(), 1);
        assert!(!parser.is_executing());
    }

    #[test]
    fn test_expect_nothing_per_mode() {
        let mut parser = Parser::new(["extra"]);
        let err = parser.expect_nothing("no arguments").unwrap_err();
        assert_eq!(
            err.downcast_ref::<UsageError>(),
            Some(&UsageError::UnexpectedArguments {
                arguments: vec!["extra".to_string()]
            })
        );

        let mut parser = Parser::new(["extra"]);
        parser.enable_help();
        assert_eq!(parser.expect_nothing("no arguments").unwrap(), Status::Success);

        let mut parser = Parser::new(["extra"]);
        parser.enable_completion();
        assert_eq!(parser.expect_nothing("no arguments").unwrap(), Status::Success);
        assert!(parser.completion().unwrap().is_closed());

        let mut parser = Parser::new(Vec::<String>::new());
        assert_eq!(parser.expect_nothing("no arguments").unwrap(), Status::Success);
    }

    #[test]
    fn test_unloadable_group_offers_nothing_while_completing() {
        let output = output_group();
        let broken = ArgumentGroup::<Flag>::lazy("project commands", || {
            Err(anyhow::anyhow!("Command file is not valid"))
        });
        let commands = command_group();

        let mut parser = Parser::new(["--v"]);
        parser.enable_completion();
        let matched = parser
            .may_have(&[&output, &broken, &commands], |_, _| Ok(Status::Success))
            .unwrap();
        assert_eq!(matched, None);
        assert_eq!(
            parser.take_completion().unwrap().render(),
            "--verbose --version"
        );

        let mut parser = Parser::new(["--version", ""]);
        parser.enable_completion();
        let mut applied = Vec::new();
        parser
            .may_have(&[&broken, &commands], record(&mut applied))
            .unwrap();
        assert_eq!(applied, vec![Flag::Version]);

        // Executing still reports the broken group.
        let mut parser = Parser::new(["--version"]);
        assert!(
            parser
                .may_have(&[&broken, &commands], |_, _| Ok(Status::Success))
                .is_err()
        );
    }

    #[test]
    fn test_stream_helpers() {
        let mut parser = Parser::new(["cmd", "--save", "--", "ls", "-la"]);
        parser.remove_first_argument();
        assert_eq!(parser.shift().as_deref(), Some("--save"));
        assert_eq!(parser.shift().as_deref(), Some("--"));
        assert_eq!(parser.get_rest(), vec!["ls".to_string(), "-la".to_string()]);
        assert_eq!(parser.remaining(), 0);
        assert_eq!(parser.peek(), None);
    }
}
