use chrono::{DateTime, Locale, Utc};

use crate::validation::{ValidationError, parse_timestamp};

/// Month and weekday names are rendered in this locale.
pub const DISPLAY_LOCALE: Locale = Locale::en_US;

/// Named presentation styles for show start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
    /// `Tue 05, 21, 2019 9:30PM`
    #[default]
    Medium,
}

impl DateStyle {
    fn pattern(self) -> &'static str {
        match self {
            DateStyle::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateStyle::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>, style: DateStyle) -> String {
    timestamp
        .format_localized(style.pattern(), DISPLAY_LOCALE)
        .to_string()
}

/// Parses an ISO-ish timestamp and renders it in `style`.
pub fn format_datetime(raw: &str, style: DateStyle) -> Result<String, ValidationError> {
    let timestamp = parse_timestamp(raw)?;
    Ok(format_timestamp(&timestamp, style))
}
