//! Number and clock formatting for display fields.

use chrono::{DateTime, TimeZone};

/// Shown for any value the current view cannot supply.
pub const PLACEHOLDER: &str = "--";

pub fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.1}"))
}

pub fn integer(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{}", v.round() as i64))
}

/// Metres to kilometres, one decimal.
pub fn kilometres(metres: Option<f64>) -> String {
    one_decimal(metres.map(|m| m / 1000.0))
}

/// "HH:MM"
pub fn clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M").to_string()
}
