//! # shcmd
//!
//! Library behind the `cmd` binary: a manager for custom shell commands that are
//! stored globally or per project and invoked by alias.
//!
//! The heart of the crate is [`core::parser::Parser`], a token-stream resolver that
//! runs the same matching walk in three modes: it executes matched actions, prints
//! their help, or collects shell-completion candidates into a
//! [`core::complete::Complete`] accumulator.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared flag set by the interrupt handler and polled by long-running operations.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod system;
