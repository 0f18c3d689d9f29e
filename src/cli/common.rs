//! Shared prompt helpers for interactive commands.

use anyhow::Result;

/// Let the user pick one name from a list.
///
/// Returns `None` when there is nothing to pick from or the prompt was
/// cancelled; the caller decides whether that is an error.
pub fn pick_name(names: &[String], message: &str) -> Result<Option<String>> {
    if names.is_empty() {
        return Ok(None);
    }

    match inquire::Select::new(message, names.to_vec()).prompt() {
        Ok(choice) => Ok(Some(choice)),
        Err(
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted,
        ) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Free-text prompt for a single value.
///
/// Returns `None` for empty input or a cancelled prompt.
pub fn prompt_value(message: &str) -> Result<Option<String>> {
    match inquire::Text::new(message).prompt() {
        Ok(value) => {
            let value = value.trim();
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(value.to_string()))
            }
        }
        Err(
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted,
        ) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
