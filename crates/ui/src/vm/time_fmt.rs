use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Date part only, for compact badges.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Countdown as zero-padded `HH:MM:SS`.
#[must_use]
pub fn format_countdown(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// `"1h 5m"`, or `"45m"` when under an hour.
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Marks print like the grader sends them: `7`, `7.5`.
#[must_use]
pub fn format_marks(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn countdown_pads_every_field() {
        assert_eq!(format_countdown(0), "00:00:00");
        assert_eq!(format_countdown(59), "00:00:59");
        assert_eq!(format_countdown(299), "00:04:59");
        assert_eq!(format_countdown(3_661), "01:01:01");
    }

    #[test]
    fn duration_omits_zero_hours() {
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(60), "1h 0m");
        assert_eq!(format_duration(95), "1h 35m");
    }

    #[test]
    fn marks_drop_trailing_zero() {
        assert_eq!(format_marks(7.0), "7");
        assert_eq!(format_marks(7.5), "7.5");
    }

    #[test]
    fn datetime_is_minute_precision_utc() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 30).unwrap();
        assert_eq!(format_datetime(at), "2024-03-01 09:05");
        assert_eq!(format_date(at), "2024-03-01");
    }
}
