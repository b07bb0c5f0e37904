// src/state.rs

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};

use crate::CancellationToken;
use crate::core::complete::Complete;
use crate::core::config_loader::{self, Config};
use crate::core::paths;
use crate::core::project::Project;

/// Everything one invocation of `cmd` works with. Survives pipeline re-runs,
/// unlike the per-run copy of the settings.
#[derive(Debug)]
pub struct RunContext {
    pub working_directory: PathBuf,
    /// The detected project, if the working directory is inside one.
    pub project: Option<Project>,
    pub global_commands_file: PathBuf,
    /// `<config dir>/cmd`, home of the global commands and completion scripts.
    pub config_dir: PathBuf,
    /// Settings as loaded from `config.toml`.
    pub settings: Config,
    pub cancellation_token: CancellationToken,
    /// Set once the default command has been injected. Guards against a second injection.
    pub default_injected: bool,
    /// Set by `--complete`; later runs resolve in completion mode.
    pub completing: bool,
    pub pipeline_runs: usize,
    /// Accumulator carried from one pipeline run to the next while completing.
    pub completion: Option<Complete>,
}

impl RunContext {
    /// Builds the context from the real environment: working directory, config
    /// directory and settings file.
    pub fn from_environment(cancellation_token: CancellationToken) -> Result<Self> {
        let working_directory = env::current_dir()?;
        let config_dir = paths::get_cmd_config_dir()?;
        let settings = config_loader::load_config(&paths::config_file_path(&config_dir))?;
        Ok(Self::new(
            working_directory,
            config_dir,
            settings,
            cancellation_token,
        ))
    }

    /// Builds a context for explicit directories. Project detection starts at
    /// `working_directory`.
    pub fn new(
        working_directory: PathBuf,
        config_dir: PathBuf,
        settings: Config,
        cancellation_token: CancellationToken,
    ) -> Self {
        let project = Project::detect(&working_directory);
        Self {
            working_directory,
            project,
            global_commands_file: paths::global_commands_path(&config_dir),
            config_dir,
            settings,
            cancellation_token,
            default_injected: false,
            completing: false,
            pipeline_runs: 0,
            completion: None,
        }
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project.as_ref().map(|p| p.directory.as_path())
    }
}
