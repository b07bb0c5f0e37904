//! # Command Line Layer
//!
//! - **`dispatcher`**: builds the argument groups of a run and drives the resolver
//!   over them, re-running when the default command is injected or completion
//!   is requested.
//! - **`handlers`**: one module per management command, plus the alias runner.
//! - **`args`**: value types accepted on the command line.

pub mod args;
pub mod dispatcher;
pub mod handlers;
