//! Display formatters for the web client.
//!
//! All output is hard-coded to the Arabic (Egypt) presentation used by the
//! storefront:
//!
//! - [`format_date`] renders a timestamp as a full Arabic date and time
//! - [`format_time_ago`] renders a relative "منذ ..." phrase
//! - [`status_color`] / [`status_badge`] map an open/closed flag to CSS tokens
//!
//! Unparseable timestamps never fail; they degrade to [`INVALID_DATE`] or
//! [`JUST_NOW`].

pub mod date;
pub mod status;
pub mod time_ago;

pub use date::{format_date, format_date_in, DateInput, INVALID_DATE};
pub use status::{status_badge, status_color};
pub use time_ago::{format_time_ago, format_time_ago_at, JUST_NOW};

/// Replaces ASCII digits with Arabic-Indic digits (`٠`-`٩`).
///
/// ```
/// use dukkan_shared::format::to_arabic_digits;
///
/// assert_eq!(to_arabic_digits("2024-01"), "٢٠٢٤-٠١");
/// ```
#[must_use]
pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            // U+0660 ARABIC-INDIC DIGIT ZERO
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}
