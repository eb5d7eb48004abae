//! Individual field validators.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateLength;

use super::ValidationResult;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: u64 = 8;
/// Minimum username length, in characters.
pub const MIN_USERNAME_LENGTH: u64 = 3;
/// Maximum username length, in characters.
pub const MAX_USERNAME_LENGTH: u64 = 100;
/// Youngest accepted age.
pub const MIN_AGE: f64 = 16.0;
/// Oldest accepted age.
pub const MAX_AGE: f64 = 100.0;

const EMAIL_INVALID: &str = "البريد الإلكتروني غير صالح";
const PASSWORD_TOO_SHORT: &str = "كلمة المرور يجب أن تكون 8 أحرف على الأقل";
const USERNAME_TOO_SHORT: &str = "اسم المستخدم قصير جداً";
const USERNAME_TOO_LONG: &str = "اسم المستخدم طويل جداً";
const AGE_TOO_YOUNG: &str = "يجب أن يكون عمرك 16 سنة على الأقل";
const AGE_INVALID: &str = "العمر غير صالح";

// Non-blank local part, "@", then a domain with at least one dot.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email pattern")
});

/// Returns `true` when `email` looks like an address.
///
/// Permissive: anything with a local part, an `@` and a dotted domain passes.
#[must_use]
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Same check as [`validate_email`], in [`ValidationResult`] form.
#[must_use]
pub fn check_email(email: &str) -> ValidationResult {
    if validate_email(email) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(EMAIL_INVALID)
    }
}

/// Requires at least [`MIN_PASSWORD_LENGTH`] characters.
#[must_use]
pub fn validate_password(password: &str) -> ValidationResult {
    if password.validate_length(Some(MIN_PASSWORD_LENGTH), None, None) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(PASSWORD_TOO_SHORT)
    }
}

/// Requires between [`MIN_USERNAME_LENGTH`] and [`MAX_USERNAME_LENGTH`]
/// characters, inclusive.
#[must_use]
pub fn validate_username(username: &str) -> ValidationResult {
    if !username.validate_length(Some(MIN_USERNAME_LENGTH), None, None) {
        return ValidationResult::invalid(USERNAME_TOO_SHORT);
    }
    if !username.validate_length(None, Some(MAX_USERNAME_LENGTH), None) {
        return ValidationResult::invalid(USERNAME_TOO_LONG);
    }
    ValidationResult::valid()
}

/// Requires an age between [`MIN_AGE`] and [`MAX_AGE`], inclusive.
///
/// Fractional ages are compared as-is, so `15.5` is too young. `NaN` and
/// infinities are invalid.
#[must_use]
pub fn validate_age(age: f64) -> ValidationResult {
    if !age.is_finite() || age > MAX_AGE {
        ValidationResult::invalid(AGE_INVALID)
    } else if age < MIN_AGE {
        ValidationResult::invalid(AGE_TOO_YOUNG)
    } else {
        ValidationResult::valid()
    }
}
