//! # System Interaction Layer
//!
//! The boundary between the command logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns stored commands and editors as child processes, with
//!   support for graceful cancellation (`Ctrl+C`) and the `cmd /C` fallback on Windows.
//! - **`environment`**: home directory, shell history and `$EDITOR` lookups.
//! - **`completion`**: installs the bash and zsh completion setup scripts.

pub mod completion;
pub mod environment;
pub mod executor;
