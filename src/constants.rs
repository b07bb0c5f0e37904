// src/constants.rs

/// Name of the application directory inside the system config directory.
pub const APP_DIR_NAME: &str = "cmd";

/// Name of the directory marking a project root (created by `cmd --init`).
pub const PROJECT_DIR: &str = ".cmd";

/// Name of the command collection file, both globally and inside `.cmd/`.
pub const COMMANDS_FILENAME: &str = "commands.json";

/// Name of the user configuration file (in `~/.config/cmd/`).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Name of the directory holding the shell completion setup scripts.
pub const COMPLETION_DIR: &str = "completion";

/// Variable exported to child processes and substituted in saved commands.
pub const PROJECT_ROOT_VAR: &str = "CMD_PROJECT_ROOT";

/// Name the tool is invoked by, used in help and completion output.
pub const PROGRAM_NAME: &str = "cmd";

/// Version reported by `cmd --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Editor used by `cmd --edit` when `$EDITOR` is not set.
pub const DEFAULT_EDITOR: &str = "vim";
