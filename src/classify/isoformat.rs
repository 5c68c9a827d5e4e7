//! ISO-8601 rendering in the `isoformat()` shape: fractional seconds only
//! when non-zero, always six digits, offsets as `+HH:MM` (`+HH:MM:SS` when
//! the offset has a seconds part).
use std::fmt::Write;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

pub fn date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn datetime(dt: &NaiveDateTime) -> String {
    let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    // leap seconds are carried as nanosecond >= 1e9
    let micros = (dt.nanosecond() % 1_000_000_000) / 1_000;
    if micros != 0 {
        write!(out, ".{micros:06}").ok();
    }
    out
}

pub fn datetime_tz(dt: &DateTime<FixedOffset>) -> String {
    let mut out = datetime(&dt.naive_local());
    let offset = dt.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.unsigned_abs();
    write!(out, "{sign}{:02}:{:02}", offset / 3600, offset % 3600 / 60).ok();
    if offset % 60 != 0 {
        write!(out, ":{:02}", offset % 60).ok();
    }
    out
}
