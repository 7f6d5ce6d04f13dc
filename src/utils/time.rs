//! Time utilities: parsing HH:MM, formatting Unix timestamps and durations.

use chrono::{DateTime, Local, NaiveTime};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M").ok()
}

/// Local `YYYY-MM-DD HH:MM:SS` for a Unix timestamp.
pub fn format_timestamp(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.with_timezone(&Local).format("%F %T").to_string(),
        None => ts.to_string(),
    }
}

pub fn format_seconds(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    format!("{}{:02}:{:02}", sign, s / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_hh_mm() {
        assert_eq!(parse_time("06:00"), NaiveTime::from_hms_opt(6, 0, 0));
        assert_eq!(parse_time("15:00"), NaiveTime::from_hms_opt(15, 0, 0));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("6am"), None);
    }

    #[test]
    fn formats_durations_as_minutes_and_seconds() {
        assert_eq!(format_seconds(720), "12:00");
        assert_eq!(format_seconds(65), "01:05");
    }
}
