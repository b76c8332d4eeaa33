use chrono::{DateTime, Duration, Utc};

use super::CommandReply;

pub fn run(started_at: DateTime<Utc>, now: DateTime<Utc>) -> CommandReply {
    CommandReply::public(format!("Up for {}", format_duration(now - started_at)))
}

/// Formats a duration as `1d 2h 3m 4s`, starting at the largest non-zero unit.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let units = [
        (total / 86_400, "d"),
        (total % 86_400 / 3_600, "h"),
        (total % 3_600 / 60, "m"),
        (total % 60, "s"),
    ];

    let parts: Vec<String> = units
        .iter()
        .skip_while(|(value, unit)| *value == 0 && *unit != "s")
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    parts.join(" ")
}
