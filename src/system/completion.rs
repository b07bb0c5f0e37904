// src/system/completion.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::Shell;
use crate::core::paths;

const BASH_SETUP: &str = include_str!("../../completion/setup.bash");
const ZSH_SETUP: &str = include_str!("../../completion/setup.zsh");

/// The completion setup script shipped for `shell`.
pub fn setup_script(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH_SETUP,
        Shell::Zsh => ZSH_SETUP,
    }
}

/// Writes the setup script for `shell` into the completion directory, unless it is
/// already there, and returns its path.
pub fn install_setup_script(shell: Shell, config_dir: &Path) -> anyhow::Result<PathBuf> {
    let script_path = paths::completion_dir(config_dir)?.join(format!("setup.{}", shell));
    if !script_path.exists() {
        fs::write(&script_path, setup_script(shell))?;
        log::debug!("Installed completion script at '{}'", script_path.display());
    }
    Ok(script_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_keeps_existing_script() {
        let tmp = tempfile::tempdir().unwrap();
        let path = install_setup_script(Shell::Bash, tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("completion").join("setup.bash"));
        assert!(fs::read_to_string(&path).unwrap().contains("--complete"));

        fs::write(&path, "# customized").unwrap();
        install_setup_script(Shell::Bash, tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# customized");
    }

    #[test]
    fn test_scripts_call_the_completion_protocol() {
        for shell in [Shell::Bash, Shell::Zsh] {
            assert!(setup_script(shell).contains("--complete"));
        }
    }
}
