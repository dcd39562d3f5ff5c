//! Reminder-time resolution.
//!
//! Turns free text like `in 2 hours`, `tomorrow 9am`, `today at 5` or an
//! ISO-8601 timestamp into an absolute point in time relative to a supplied
//! `now`. Rules are tried in order and the first match wins:
//!
//! 1. Absolute date/time, only when the raw input contains a `-`.
//! 2. `in <n> <minute|hour|day|week>[s]`, fixed-duration arithmetic.
//! 3. `tomorrow [time]`, defaulting to 09:00 when no trailing clock time
//!    is found.
//! 4. `[today] [at] H[:MM][am|pm]` on `now`'s date.
//!
//! "Local" always means the time zone of `now`.

use std::sync::LazyLock;

use chrono::{
    DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use regex::Regex;
use tracing::trace;

use crate::clock::Clock;
use crate::error::TemporalError;

/// `in <n> <unit>[s]`, on trimmed lower-case input.
static RELATIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^in\s+(\d+)\s+(minute|hour|day|week)s?$").expect("Invalid relative regex")
});

/// Clock time closing the input after the `tomorrow` prefix.
static CLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:at\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$")
        .expect("Invalid clock regex")
});

/// Whole-input `[today] [at] H[:MM][am|pm]`.
static TODAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:today\s+)?(?:at\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$")
        .expect("Invalid today regex")
});

/// Naive date-time layouts accepted by the absolute fast path.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Default time for `tomorrow` without an explicit clock time.
const DEFAULT_HOUR: u32 = 9;

/// Resolves `input` against `now`.
///
/// Pure: the same input and `now` always give the same result.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use telebiz_core::temporal::resolve_remind_at;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let at = resolve_remind_at("in 2 hours", &now).unwrap();
/// assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap());
/// ```
pub fn resolve_remind_at<Tz: TimeZone>(
    input: &str,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>, TemporalError> {
    let unparseable = || TemporalError::Unparseable(input.to_string());

    if input.contains('-') {
        if let Some(at) = parse_absolute(input, &now.timezone()) {
            trace!("'{}' resolved as absolute date", input);
            return Ok(at);
        }
    }

    let text = input.trim().to_lowercase();

    if let Some(caps) = RELATIVE_REGEX.captures(&text) {
        trace!("'{}' resolved as relative offset", input);
        let amount: i64 = caps[1].parse().map_err(|_| unparseable())?;
        let unit_secs = unit_seconds(&caps[2]);
        return amount
            .checked_mul(unit_secs)
            .and_then(Duration::try_seconds)
            .and_then(|offset| now.clone().checked_add_signed(offset))
            .ok_or_else(unparseable);
    }

    if let Some(rest) = text.strip_prefix("tomorrow") {
        trace!("'{}' resolved as tomorrow", input);
        let date = now
            .date_naive()
            .checked_add_days(Days::new(1))
            .ok_or_else(unparseable)?;
        let time = match CLOCK_REGEX.captures(rest) {
            Some(caps) => clock_time(&caps).ok_or_else(unparseable)?.time,
            None => NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).ok_or_else(unparseable)?,
        };
        return localize(&now.timezone(), date, time).ok_or_else(unparseable);
    }

    if let Some(caps) = TODAY_REGEX.captures(&text) {
        trace!("'{}' resolved as time today", input);
        let clock = clock_time(&caps).ok_or_else(unparseable)?;
        let tz = now.timezone();
        let date = now.date_naive();
        let at = localize(&tz, date, clock.time).ok_or_else(unparseable)?;

        // A bare "5" that has already passed today means 17:00.
        if clock.meridiem.is_none() && (1..=11).contains(&clock.time.hour()) && at <= *now {
            let afternoon = clock
                .time
                .with_hour(clock.time.hour() + 12)
                .ok_or_else(unparseable)?;
            return localize(&tz, date, afternoon).ok_or_else(unparseable);
        }
        return Ok(at);
    }

    Err(unparseable())
}

/// Resolves against a [`Clock`] and returns the instant in UTC.
pub fn resolve_with_clock(input: &str, clock: &dyn Clock) -> Result<DateTime<Utc>, TemporalError> {
    resolve_remind_at(input, &clock.now()).map(|at| at.with_timezone(&Utc))
}

fn unit_seconds(unit: &str) -> i64 {
    match unit {
        "minute" => 60,
        "hour" => 3_600,
        "day" => 86_400,
        _ => 604_800,
    }
}

/// A parsed clock time plus the meridiem it was written with.
struct ClockTime<'a> {
    time: NaiveTime,
    meridiem: Option<&'a str>,
}

/// Converts `H[:MM][am|pm]` captures into a 24-hour time.
///
/// `pm` adds 12 to hours below 12; `12am` is midnight. Out-of-range
/// results give `None`.
fn clock_time<'a>(caps: &regex::Captures<'a>) -> Option<ClockTime<'a>> {
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let meridiem = caps.get(3).map(|m| m.as_str());

    match meridiem {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }

    Some(ClockTime {
        time: NaiveTime::from_hms_opt(hour, minute, 0)?,
        meridiem,
    })
}

/// Places a wall-clock date and time in `tz`. Nonexistent local times
/// (DST gaps) give `None`; ambiguous ones take the earlier instant.
fn localize<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

/// Generic date/time parse for the absolute fast path.
fn parse_absolute<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let s = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(tz));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    // Date-only ISO strings are midnight UTC.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight).with_timezone(tz))
}
