use chrono::{DateTime, Utc};

const INTERVALS: [(&str, i64); 5] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// "3 hours ago" style label for `then`, measured against `now`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    for (label, length) in INTERVALS {
        let count = seconds / length;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{} {}{} ago", count, label, plural);
        }
    }
    "just now".to_string()
}

/// Same as [`time_ago`] against the current clock; absent timestamps render
/// as an empty label.
pub fn time_ago_now(then: Option<DateTime<Utc>>) -> String {
    then.map(|t| time_ago(t, Utc::now())).unwrap_or_default()
}

pub fn format_date(then: Option<DateTime<Utc>>) -> String {
    then.map(|t| t.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}
