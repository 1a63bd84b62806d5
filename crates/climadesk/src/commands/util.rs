//! Shared helpers for command handlers.

use climadesk_core::RoomNumber;

use crate::error::CliError;

/// Parse a room argument, reporting the offending value on failure.
pub fn parse_room(raw: &str) -> Result<RoomNumber, CliError> {
    RoomNumber::new(raw).map_err(|e| CliError::Validation {
        field: "room".into(),
        reason: e.message().to_owned(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
