// src/core/mod.rs

pub mod args;
pub mod command;
pub mod complete;
pub mod config_loader;
pub mod parser;
pub mod paths;
pub mod project;
pub mod storage;
