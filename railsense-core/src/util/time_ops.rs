use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer};

pub const APP_CLOCK_FORMAT: &str = "%H:%M:%S";
pub const APP_SHORT_CLOCK_FORMAT: &str = "%H:%M";
pub const MINUTES_PER_DAY: i64 = 1440;

/// literal used by timetable exports for a stop without a scheduled time
pub const MISSING_CLOCK_LITERAL: &str = "None";

/// parses a timetable clock string. "None", the empty string and anything that
/// is not a valid `HH:MM:SS` or `HH:MM` clock are all treated as unknown.
pub fn parse_clock(clock: &str) -> Option<NaiveTime> {
    let trimmed = clock.trim();
    if trimmed.is_empty() || trimmed == MISSING_CLOCK_LITERAL {
        return None;
    }
    NaiveTime::parse_from_str(trimmed, APP_CLOCK_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, APP_SHORT_CLOCK_FORMAT))
        .ok()
}

/// minutes since the start of day 1 of a timetable: `(day-1)*1440 + hour*60 + minute`.
/// seconds are dropped. day indices start at 1; a missing or zero day yields None.
pub fn minute_offset(day: Option<u32>, clock: Option<&str>) -> Option<i64> {
    let day = day.filter(|d| *d >= 1)?;
    let time = parse_clock(clock?)?;
    let offset = (day as i64 - 1) * MINUTES_PER_DAY
        + time.hour() as i64 * 60
        + time.minute() as i64;
    Some(offset)
}

/// rounds to two decimal places, the precision used for all reported minutes and scores.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// deserializes a clock field that may be absent, null, or a string.
pub fn deserialize_optional_clock<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| {
        let known = parse_clock(s).is_some();
        if !known && s.trim() != MISSING_CLOCK_LITERAL {
            log::debug!("treating unparseable clock '{s}' as unknown");
        }
        known
    }))
}
