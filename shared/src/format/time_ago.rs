//! Relative "time ago" formatting.

use chrono::{DateTime, Utc};

use super::date::DateInput;

/// Output for instants less than a second old (or in the future).
pub const JUST_NOW: &str = "الآن";

/// Named intervals from largest to smallest, in seconds.
const INTERVALS: [(&str, i64); 7] = [
    ("سنة", 31_536_000),
    ("شهر", 2_592_000),
    ("أسبوع", 604_800),
    ("يوم", 86_400),
    ("ساعة", 3_600),
    ("دقيقة", 60),
    ("ثانية", 1),
];

/// Formats how long ago `input` was, relative to the current instant.
///
/// ```
/// use dukkan_shared::chrono::{Duration, Utc};
/// use dukkan_shared::format::format_time_ago;
///
/// let two_days_ago = Utc::now() - Duration::days(2);
/// assert_eq!(format_time_ago(two_days_ago), "منذ 2 يوم");
/// ```
#[must_use]
pub fn format_time_ago<'a>(input: impl Into<DateInput<'a>>) -> String {
    format_time_ago_at(input, Utc::now())
}

/// Formats how long before `now` the `input` instant was.
///
/// Uses the largest interval that fits at least once, with the count
/// truncated to a whole number. Future instants, sub-second gaps and
/// unparseable input all yield [`JUST_NOW`].
#[must_use]
pub fn format_time_ago_at<'a>(input: impl Into<DateInput<'a>>, now: DateTime<Utc>) -> String {
    let Some(then) = input.into().resolve() else {
        return JUST_NOW.to_string();
    };

    let elapsed = now.signed_duration_since(then).num_seconds();
    if elapsed < 1 {
        return JUST_NOW.to_string();
    }

    INTERVALS
        .iter()
        .find_map(|&(unit, seconds)| {
            let count = elapsed / seconds;
            (count >= 1).then(|| format!("منذ {count} {unit}"))
        })
        .unwrap_or_else(|| JUST_NOW.to_string())
}
