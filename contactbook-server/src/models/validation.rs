//! Validation error types

use std::fmt;

/// Validation error for request shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field is shorter than its minimum length
    TooShort { field: &'static str, min: usize },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be decoded at all
    Malformed { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::Malformed { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that `value` holds between `min` and `max` characters.
///
/// A `min` of 1 reports [`ValidationError::Empty`] for blank input instead of
/// [`ValidationError::TooShort`].
pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();

    if value.trim().is_empty() && min > 0 {
        return Err(ValidationError::Empty { field });
    }
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 50,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 50 characters"
        );
    }

    #[test]
    fn length_bounds() {
        assert!(check_length("name", "Ann", 1, 25).is_ok());
        assert_eq!(
            check_length("name", "   ", 1, 25),
            Err(ValidationError::Empty { field: "name" })
        );
        assert_eq!(
            check_length("username", "ab", 3, 50),
            Err(ValidationError::TooShort {
                field: "username",
                min: 3
            })
        );
        assert_eq!(
            check_length("name", &"x".repeat(26), 1, 25),
            Err(ValidationError::TooLong {
                field: "name",
                max: 25
            })
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 25 two-byte characters still fit a 25 character column
        assert!(check_length("name", &"ä".repeat(25), 1, 25).is_ok());
    }
}
