//! Field validators for sign-up and profile forms.
//!
//! Every validator is a pure function: invalid input is reported through the
//! returned value, never through an error or panic.
//!
//! # Example
//!
//! ```
//! use dukkan_shared::validation::{validate_age, validate_email, validate_username};
//!
//! assert!(validate_email("a@b.com"));
//! assert!(validate_username("abc").is_valid);
//! assert!(!validate_age(15.5).is_valid);
//! ```

pub mod fields;

pub use fields::{
    check_email, validate_age, validate_email, validate_password, validate_username,
    MAX_AGE, MAX_USERNAME_LENGTH, MIN_AGE, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of validating a single field.
///
/// `message` carries the localized reason and is present only when the
/// field is invalid. Serializes as `{"isValid": .., "message": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the field passed.
    pub is_valid: bool,
    /// Why the field failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A failed field validation, for callers that prefer `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The localized reason.
    pub message: String,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    /// A failing result with the given reason.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] carrying the message when invalid.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ValidationError {
                message: self.message.unwrap_or_default(),
            })
        }
    }
}
