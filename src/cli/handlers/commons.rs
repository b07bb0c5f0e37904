// src/cli/handlers/commons.rs

// Shared helpers used by multiple handlers.

use anyhow::Result;
use dialoguer::{Input, theme::ColorfulTheme};
use std::sync::atomic::Ordering;

use crate::CancellationToken;
use crate::system::executor::ExecutionError;

/// Fails with [`ExecutionError::Cancelled`] once an interrupt was received.
pub fn check_for_cancellation(cancellation_token: &CancellationToken) -> Result<(), ExecutionError> {
    if cancellation_token.load(Ordering::SeqCst) {
        return Err(ExecutionError::Cancelled);
    }
    Ok(())
}

/// Asks for a line of text. An empty answer is allowed.
pub fn prompt_text(prompt: &str, cancellation_token: &CancellationToken) -> Result<String> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    check_for_cancellation(cancellation_token)?;
    Ok(input.trim().to_string())
}

/// Asks for a line of text with `initial` already typed in, ready to edit.
pub fn prompt_prefilled(
    prompt: &str,
    initial: &str,
    cancellation_token: &CancellationToken,
) -> Result<String> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    check_for_cancellation(cancellation_token)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_check_for_cancellation() {
        let token: CancellationToken = Arc::new(AtomicBool::new(false));
        assert!(check_for_cancellation(&token).is_ok());
        token.store(true, Ordering::SeqCst);
        assert!(matches!(
            check_for_cancellation(&token),
            Err(ExecutionError::Cancelled)
        ));
    }
}
