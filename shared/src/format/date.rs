//! Absolute date formatting.

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};

use super::to_arabic_digits;

/// Output for timestamps that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const MONTHS: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

const AM: &str = "ص";
const PM: &str = "م";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// A timestamp as handed over by callers: ISO text or a native value.
///
/// Text is not validated up front; [`DateInput::resolve`] returns `None` for
/// anything it cannot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    /// ISO-8601 / RFC 3339 text.
    Text(&'a str),
    /// An already-parsed instant.
    Instant(DateTime<Utc>),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
}

impl DateInput<'_> {
    /// Resolves the input to an instant.
    ///
    /// Text is read as, in order:
    /// 1. RFC 3339 with an explicit offset
    /// 2. a date-time without offset, taken as local time
    /// 3. a bare `YYYY-MM-DD` date, taken as UTC midnight
    #[must_use]
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match *self {
            Self::Instant(instant) => Some(instant),
            Self::EpochMillis(millis) => DateTime::from_timestamp_millis(millis),
            Self::Text(text) => parse_text(text.trim()),
        }
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<DateTime<FixedOffset>> for DateInput<'_> {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self::Instant(instant.with_timezone(&Utc))
    }
}

impl From<DateTime<Local>> for DateInput<'_> {
    fn from(instant: DateTime<Local>) -> Self {
        Self::Instant(instant.with_timezone(&Utc))
    }
}

impl From<i64> for DateInput<'_> {
    fn from(millis: i64) -> Self {
        Self::EpochMillis(millis)
    }
}

/// Formats a timestamp in local time for display.
///
/// # Example
///
/// ```
/// use dukkan_shared::format::{format_date, INVALID_DATE};
///
/// assert!(format_date("2024-06-15T12:00:00Z").contains("يونيو"));
/// assert_eq!(format_date("not a date"), INVALID_DATE);
/// ```
#[must_use]
pub fn format_date<'a>(input: impl Into<DateInput<'a>>) -> String {
    format_date_in(input, &Local)
}

/// Formats a timestamp in the given time zone.
///
/// Renders day, full month name, year, then the 12-hour time with an
/// `ص`/`م` marker, all digits Arabic-Indic:
///
/// ```
/// use dukkan_shared::chrono::Utc;
/// use dukkan_shared::format::format_date_in;
///
/// assert_eq!(
///     format_date_in("2024-01-15T10:30:00Z", &Utc),
///     "١٥ يناير ٢٠٢٤ في ١٠:٣٠ ص"
/// );
/// ```
#[must_use]
pub fn format_date_in<'a, Tz: TimeZone>(input: impl Into<DateInput<'a>>, tz: &Tz) -> String {
    let Some(instant) = input.into().resolve() else {
        return INVALID_DATE.to_string();
    };
    let local = instant.with_timezone(tz);

    let (is_pm, hour) = local.hour12();
    let month = MONTHS[local.month0() as usize];
    let marker = if is_pm { PM } else { AM };

    let text = format!(
        "{} {} {} في {:02}:{:02} {}",
        local.day(),
        month,
        local.year(),
        hour,
        local.minute(),
        marker
    );
    to_arabic_digits(&text)
}
