// src/cli/handlers/mod.rs

// One module per management command, plus the alias runner.

pub mod commons;
pub mod complete;
pub mod completion;
pub mod edit;
pub mod help;
pub mod init;
pub mod invoke;
pub mod save;
pub mod version;
