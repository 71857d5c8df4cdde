//! Shared helpers for command handlers.

use std::io::IsTerminal;

use crate::error::CliError;

/// `all` selects every port, in any letter case.
pub fn is_all(target: &str) -> bool {
    target.eq_ignore_ascii_case("all")
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn all_is_case_insensitive() {
        assert!(is_all("all"));
        assert!(is_all("ALL"));
        assert!(!is_all("1"));
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Disable all ports?", true).unwrap());
    }
}
