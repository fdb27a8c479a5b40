//! Presentation helpers shared by every panel.

use chrono::{DateTime, NaiveDate, Timelike};

/// Round half up, so 20.5 shows as 21 and -2.5 as -2.
pub fn round_temp(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Local wall-clock time as "H:MM am/pm".
///
/// `offset_secs` is the location's shift from UTC; the epoch is shifted by it
/// and then read as UTC, so the host's timezone never matters.
pub fn format_time(epoch_secs: i64, offset_secs: i64) -> String {
    let Some(local) =
        epoch_secs.checked_add(offset_secs).and_then(|secs| DateTime::from_timestamp(secs, 0))
    else {
        return "--:--".to_string();
    };

    let hours = local.hour();
    let ampm = if hours >= 12 { "pm" } else { "am" };
    let hours = match hours % 12 {
        0 => 12,
        h => h,
    };

    format!("{hours}:{:02} {ampm}", local.minute())
}

/// "2024-06-02" → "June 2". Anything unparseable is returned unchanged.
pub fn format_date_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%B %-d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

pub fn visibility_km(metres: u32) -> String {
    format!("{:.1}", f64::from(metres) / 1000.0)
}
