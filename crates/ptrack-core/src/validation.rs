//! Input checks shared by the entity store and user directory.

use crate::error::{TrackerError, TrackerResult};

/// Longest accepted project or task name.
pub(crate) const MAX_NAME_LEN: usize = 255;

/// Longest accepted username.
pub(crate) const MAX_USERNAME_LEN: usize = 150;

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> TrackerResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TrackerError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(TrackerError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Require a percentage in `0..=100`.
pub(crate) fn percentage(field: &str, value: i64) -> TrackerResult<u8> {
    match u8::try_from(value) {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(TrackerError::validation(format!(
            "{field} must be between 0 and 100, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "  Launch  ", 10).unwrap(), "Launch");
        assert!(required_text("name", "   ", 10).is_err());
        assert!(required_text("name", "abcdefghijk", 10).is_err());
        assert!(required_text("name", "ééééé", 5).is_ok());
    }

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(percentage("progress", 0).unwrap(), 0);
        assert_eq!(percentage("progress", 100).unwrap(), 100);
        assert!(percentage("progress", 101).is_err());
        assert!(percentage("progress", 150).is_err());
        assert!(percentage("progress", -1).is_err());
    }
}
