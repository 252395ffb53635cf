//! Shared helpers for command handlers.

use std::io::IsTerminal;

use busops_core::pages::PendingConfirm;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses rather than guessing.
pub fn confirm<T>(pending: &PendingConfirm<T>, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: pending.prompt.clone(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(&pending.prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Convert a 1-based position typed by the operator into an index.
pub fn position_index(position: usize) -> Result<usize, CliError> {
    position.checked_sub(1).ok_or_else(|| CliError::Validation {
        field: "position".into(),
        reason: "positions start at 1".into(),
    })
}

/// Render an optional value for a detail view.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(position_index(1).ok(), Some(0));
        assert!(position_index(0).is_err());
    }

    #[test]
    fn yes_flag_skips_prompt() {
        let pending = PendingConfirm {
            subject: 1,
            prompt: "Delete bus stop \"Central Station\"?".into(),
        };
        assert!(confirm(&pending, true).ok().unwrap_or(false));
    }
}
