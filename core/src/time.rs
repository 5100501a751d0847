use chrono::{DateTime, Local, TimeZone, Utc};

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a stored timestamp for people: local time, second precision.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    format_in(at, &Local)
}

pub fn format_in<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}
