use chrono::{DateTime, Local, TimeZone};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

fn local(timestamp: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp).single()
}

fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}

/// Relative age for list cards, falling back to a short date after a week.
pub fn format_timestamp(timestamp: i64, now: i64) -> String {
    let Some(diff) = now.checked_sub(timestamp) else {
        return format_date(timestamp);
    };
    let mins = diff / MINUTE_MS;
    let hours = diff / HOUR_MS;
    let days = diff / DAY_MS;

    if mins < 1 {
        return "Just now".to_string();
    }
    if mins < 60 {
        return format!("{} min ago", mins);
    }
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }
    if days < 7 {
        return format!("{} day{} ago", days, plural(days));
    }
    format_date(timestamp)
}

fn format_date(timestamp: i64) -> String {
    local(timestamp)
        .map(|d| d.format("%-d %b %Y").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Day-first date and 12-hour time, e.g. `16/10/2026, 3:04:05 pm`.
pub fn format_datetime(timestamp: i64) -> String {
    local(timestamp)
        .map(|d| d.format("%d/%m/%Y, %-I:%M:%S %P").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_buckets() {
        let now = 1_000 * DAY_MS;
        assert_eq!(format_timestamp(now - 30_000, now), "Just now");
        assert_eq!(format_timestamp(now - 5 * MINUTE_MS, now), "5 min ago");
        assert_eq!(format_timestamp(now - HOUR_MS, now), "1 hour ago");
        assert_eq!(format_timestamp(now - 3 * HOUR_MS, now), "3 hours ago");
        assert_eq!(format_timestamp(now - DAY_MS, now), "1 day ago");
        assert_eq!(format_timestamp(now - 6 * DAY_MS, now), "6 days ago");
    }

    #[test]
    fn test_old_requests_show_date() {
        let now = 1_000 * DAY_MS;
        let formatted = format_timestamp(now - 30 * DAY_MS, now);
        assert!(!formatted.ends_with("ago"));
        assert_eq!(formatted.split(' ').count(), 3);
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let now = 1_000 * DAY_MS;
        assert_eq!(format_timestamp(i64::MIN, now), i64::MIN.to_string());
        assert_eq!(format_timestamp(i64::MAX, now), "Just now");
        assert_eq!(format_timestamp(i64::MAX, -2), i64::MAX.to_string());
        assert_eq!(format_datetime(i64::MIN), i64::MIN.to_string());
    }

    #[test]
    fn test_format_datetime_shape() {
        let formatted = format_datetime(1_700_000_000_000);
        assert!(formatted.contains("/2023, "));
        assert!(formatted.ends_with("am") || formatted.ends_with("pm"));
    }
}
