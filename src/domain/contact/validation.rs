//! Contact form validation

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for the sender's name
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for the subject line
pub const MAX_SUBJECT_LENGTH: usize = 200;

/// Maximum length for the message body
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Something@something.tld with no whitespace
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Contact validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ContactValidationError {
    /// At least one of name, email, subject, message is missing or blank
    MissingFields,
    /// Email fails the address pattern
    InvalidEmail,
    /// A field exceeds its maximum length
    TooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "All fields are required"),
            Self::InvalidEmail => write!(f, "Please provide a valid email address"),
            Self::TooLong { field, length, max } => write!(
                f,
                "The {} is too long: {} characters (max {})",
                field, length, max
            ),
        }
    }
}

impl std::error::Error for ContactValidationError {}

/// Check an address against the contact email pattern
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ContactValidationError> {
    let length = value.chars().count();

    if length > max {
        return Err(ContactValidationError::TooLong { field, length, max });
    }

    Ok(())
}
