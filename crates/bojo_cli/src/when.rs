//! Natural-language time resolver for the `--time` option.
//!
//! Understands a small English grammar relative to local time:
//! `now`, `in 3 hours`, `2 days ago`, `tomorrow at 6pm`, `friday noon`,
//! `6:30am`, `2026-07-01 08:15`, and RFC 3339 timestamps.

use bojo_core::{TimeParseError, TimeResolver};
use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday,
};
use once_cell::sync::Lazy;
use regex::Regex;

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^in\s+(\d{1,6})\s+(minute|min|hour|hr|day|week)s?$").expect("valid relative regex")
});
static AGO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,6})\s+(minute|min|hour|hr|day|week)s?\s+ago$").expect("valid ago regex")
});
static DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(today|tomorrow|yesterday|monday|tuesday|wednesday|thursday|friday|saturday|sunday)(?:\s+(.+))?$",
    )
    .expect("valid day regex")
});
static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:at\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$").expect("valid clock regex")
});

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Resolves text against the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimeResolver;

impl TimeResolver for LocalTimeResolver {
    fn resolve(&self, text: &str, now_ms: i64) -> Result<i64, TimeParseError> {
        let now = Local
            .timestamp_millis_opt(now_ms)
            .single()
            .ok_or_else(|| TimeParseError::new(text, "reference time is out of range"))?;
        parse_relative_to(text, now).map(|at| at.timestamp_millis())
    }
}

pub fn parse_relative_to(text: &str, now: DateTime<Local>) -> Result<DateTime<Local>, TimeParseError> {
    let trimmed = text.trim();
    let normalized = trimmed.to_lowercase();
    let fail = |reason: &str| TimeParseError::new(trimmed, reason);

    if normalized == "now" {
        return Ok(now);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Local));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return to_local(naive).ok_or_else(|| fail("time does not exist locally"));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return to_local(date.and_time(NaiveTime::MIN))
            .ok_or_else(|| fail("time does not exist locally"));
    }

    if let Some(caps) = RELATIVE_RE.captures(&normalized) {
        return Ok(now + span(&caps[1], &caps[2]).ok_or_else(|| fail("offset too large"))?);
    }
    if let Some(caps) = AGO_RE.captures(&normalized) {
        return Ok(now - span(&caps[1], &caps[2]).ok_or_else(|| fail("offset too large"))?);
    }

    if let Some(caps) = DAY_RE.captures(&normalized) {
        let date = day_from_word(&caps[1], now.date_naive());
        let time = match caps.get(2) {
            Some(clock) => parse_clock(clock.as_str()).ok_or_else(|| fail("unknown time of day"))?,
            None => now.time(),
        };
        return to_local(date.and_time(time)).ok_or_else(|| fail("time does not exist locally"));
    }

    if let Some(time) = parse_clock(&normalized) {
        return to_local(now.date_naive().and_time(time))
            .ok_or_else(|| fail("time does not exist locally"));
    }

    Err(fail("unrecognized date or time"))
}

fn span(amount: &str, unit: &str) -> Option<Duration> {
    let amount: i64 = amount.parse().ok()?;
    match unit {
        "minute" | "min" => Duration::try_minutes(amount),
        "hour" | "hr" => Duration::try_hours(amount),
        "day" => Duration::try_days(amount),
        "week" => Duration::try_weeks(amount),
        _ => None,
    }
}

fn day_from_word(word: &str, today: NaiveDate) -> NaiveDate {
    let weekday = match word {
        "today" => return today,
        "tomorrow" => return today + Duration::days(1),
        "yesterday" => return today - Duration::days(1),
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        _ => Weekday::Sun,
    };
    // Next occurrence, never today.
    let current = i64::from(today.weekday().num_days_from_monday());
    let target = i64::from(weekday.num_days_from_monday());
    let ahead = match (target - current).rem_euclid(7) {
        0 => 7,
        days => days,
    };
    today + Duration::days(ahead)
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    match text.trim() {
        "noon" | "at noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" | "at midnight" => return Some(NaiveTime::MIN),
        _ => {}
    }

    let caps = CLOCK_RE.captures(text.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let hour = match caps.get(3).map(|m| m.as_str()) {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some("am") => hour % 12,
        Some(_) => hour % 12 + 12,
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn to_local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&naive).earliest()
}

#[cfg(test)]
mod tests {
    use super::{parse_relative_to, LocalTimeResolver};
    use bojo_core::TimeResolver;
    use chrono::{DateTime, Duration, Local, TimeZone};

    // Wednesday.
    fn reference() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 6, 10, 9, 30, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn parses_day_words_with_clock_times() {
        let now = reference();
        assert_eq!(
            parse_relative_to("tomorrow at 6pm", now).expect("tomorrow"),
            local(2026, 6, 11, 18, 0)
        );
        assert_eq!(
            parse_relative_to("Wednesday noon", now).expect("next wednesday"),
            local(2026, 6, 17, 12, 0)
        );
        assert_eq!(
            parse_relative_to("friday", now).expect("friday keeps time of day"),
            local(2026, 6, 12, 9, 30)
        );
        assert_eq!(
            parse_relative_to("yesterday 12am", now).expect("midnight"),
            local(2026, 6, 9, 0, 0)
        );
    }

    #[test]
    fn parses_offsets() {
        let now = reference();
        assert_eq!(
            parse_relative_to("in 3 hours", now).expect("in hours"),
            now + Duration::hours(3)
        );
        assert_eq!(
            parse_relative_to("2 days ago", now).expect("ago"),
            now - Duration::days(2)
        );
        assert_eq!(parse_relative_to(" now ", now).expect("now"), now);
    }

    #[test]
    fn parses_absolute_forms() {
        let now = reference();
        assert_eq!(
            parse_relative_to("2026-07-01 08:15", now).expect("date time"),
            local(2026, 7, 1, 8, 15)
        );
        assert_eq!(
            parse_relative_to("2026-07-01", now).expect("date"),
            local(2026, 7, 1, 0, 0)
        );
        assert_eq!(
            parse_relative_to("6:30am", now).expect("bare clock"),
            local(2026, 6, 10, 6, 30)
        );
        assert_eq!(
            parse_relative_to("2026-07-01T08:15:00Z", now)
                .expect("rfc3339")
                .timestamp(),
            1_782_893_700
        );
    }

    #[test]
    fn rejects_unknown_text() {
        let now = reference();
        assert!(parse_relative_to("13pm", now).is_err());
        assert!(parse_relative_to("tomorrow at teatime", now).is_err());
        let err = parse_relative_to("when pigs fly", now).expect_err("nonsense");
        assert!(err.to_string().contains("when pigs fly"));
    }

    #[test]
    fn resolver_returns_epoch_millis() {
        let now = reference();
        let resolved = LocalTimeResolver
            .resolve("in 1 day", now.timestamp_millis())
            .expect("in 1 day");
        assert_eq!(resolved, (now + Duration::days(1)).timestamp_millis());
    }
}
