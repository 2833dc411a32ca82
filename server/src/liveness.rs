use chrono::{DateTime, Duration, Utc};

/// Devices that reported within this window count as online.
const ONLINE_WINDOW_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Liveness {
    pub is_online: bool,
    pub formatted: String,
}

/// Derive online/offline status and a relative-age label from the last
/// time a device was seen. `now` is passed in so callers and tests
/// control the clock.
pub fn status(last_seen: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Liveness {
    match last_seen {
        None => Liveness {
            is_online: false,
            formatted: "never".to_string(),
        },
        Some(seen) => {
            let elapsed = now - seen;
            Liveness {
                is_online: elapsed < Duration::minutes(ONLINE_WINDOW_MINUTES),
                formatted: format_time_ago(elapsed),
            }
        }
    }
}

fn format_time_ago(elapsed: Duration) -> String {
    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        let mins = elapsed.num_minutes();
        if mins == 1 {
            return "1 minute ago".to_string();
        }
        return format!("{} minutes ago", mins);
    }
    if elapsed < Duration::hours(24) {
        let hours = elapsed.num_hours();
        if hours == 1 {
            return "1 hour ago".to_string();
        }
        return format!("{} hours ago", hours);
    }
    let days = elapsed.num_hours() / 24;
    if days == 1 {
        return "1 day ago".to_string();
    }
    format!("{} days ago", days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_seen() {
        let s = status(None, Utc::now());
        assert!(!s.is_online);
        assert_eq!(s.formatted, "never");
    }

    #[test]
    fn test_just_now_is_online() {
        let now = Utc::now();
        let s = status(Some(now - Duration::seconds(30)), now);
        assert!(s.is_online);
        assert_eq!(s.formatted, "just now");
    }

    #[test]
    fn test_minutes_ago_is_online() {
        let now = Utc::now();
        let s = status(Some(now - Duration::minutes(5)), now);
        assert!(s.is_online);
        assert_eq!(s.formatted, "5 minutes ago");
    }

    #[test]
    fn test_offline_past_window() {
        let now = Utc::now();
        let s = status(Some(now - Duration::minutes(15)), now);
        assert!(!s.is_online);
        assert_eq!(s.formatted, "15 minutes ago");
    }

    #[test]
    fn test_singular_minute() {
        let now = Utc::now();
        let s = status(Some(now - Duration::seconds(90)), now);
        assert_eq!(s.formatted, "1 minute ago");
    }

    #[test]
    fn test_hours_ago() {
        let now = Utc::now();
        assert_eq!(
            status(Some(now - Duration::hours(1)), now).formatted,
            "1 hour ago"
        );
        assert_eq!(
            status(Some(now - Duration::hours(5)), now).formatted,
            "5 hours ago"
        );
    }

    #[test]
    fn test_days_ago() {
        let now = Utc::now();
        let s = status(Some(now - Duration::hours(25)), now);
        assert!(!s.is_online);
        assert_eq!(s.formatted, "1 day ago");
        assert_eq!(
            status(Some(now - Duration::days(3)), now).formatted,
            "3 days ago"
        );
    }

    #[test]
    fn test_window_boundary() {
        let now = Utc::now();
        // Exactly at the window edge is already offline.
        let s = status(Some(now - Duration::minutes(10)), now);
        assert!(!s.is_online);
    }
}
