//! The `[[DateValue]]` internal slot of Date objects.

use chrono::{DateTime, Datelike, Timelike};

use crate::error::{EngineError, EngineResult};

/// Largest absolute time value a Date may hold (ECMAScript §21.4.1.1):
/// 100 000 000 days either side of the epoch, in milliseconds.
pub const MAX_TIME_VALUE: f64 = 8.64e15;

/// A Date's time value: milliseconds since the Unix epoch, or `NaN` for an
/// invalid date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsDate {
    time: f64,
}

impl JsDate {
    /// Creates a date from a millisecond time value, applying **TimeClip**
    /// (§21.4.1.31): non-finite or out-of-range values become `NaN` and the
    /// rest are truncated toward zero.
    pub fn new(time: f64) -> Self {
        let time = if !time.is_finite() || time.abs() > MAX_TIME_VALUE {
            f64::NAN
        } else {
            time.trunc() + 0.0
        };
        Self { time }
    }

    /// Returns the clipped time value.
    pub fn time_value(&self) -> f64 {
        self.time
    }

    /// Returns `true` unless the time value is `NaN`.
    pub fn is_valid(&self) -> bool {
        !self.time.is_nan()
    }

    /// `Date.prototype.toISOString` (§21.4.4.36).
    ///
    /// Years outside `0..=9999` use the expanded six-digit signed form.
    /// Invalid dates raise a `RangeError`.
    pub fn to_iso_string(&self) -> EngineResult<String> {
        if !self.is_valid() {
            return Err(EngineError::RangeError("Invalid time value".to_string()));
        }
        let fields = CalendarFields::from_time_value(self.time as i64);
        let year = fields.year;
        let year = if (0..=9999).contains(&year) {
            format!("{year:04}")
        } else if year < 0 {
            format!("-{:06}", -year)
        } else {
            format!("+{year:06}")
        };
        Ok(format!(
            "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            fields.month, fields.day, fields.hour, fields.minute, fields.second, fields.millis,
        ))
    }
}

// ── Calendar fields ─────────────────────────────────────────────────────────

const MS_PER_DAY: i64 = 86_400_000;

/// UTC calendar fields of a time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CalendarFields {
    year: i64,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millis: u32,
}

impl CalendarFields {
    /// chrono covers years up to about ±262 000; the TimeClip range reaches
    /// ±275 760, so the remainder goes through proleptic Gregorian arithmetic.
    fn from_time_value(ms: i64) -> Self {
        match DateTime::from_timestamp_millis(ms) {
            Some(dt) => Self {
                year: i64::from(dt.year()),
                month: dt.month(),
                day: dt.day(),
                hour: dt.hour(),
                minute: dt.minute(),
                second: dt.second(),
                millis: dt.timestamp_subsec_millis(),
            },
            None => Self::from_civil_days(ms),
        }
    }

    fn from_civil_days(ms: i64) -> Self {
        let days = ms.div_euclid(MS_PER_DAY);
        let in_day = ms.rem_euclid(MS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        // `in_day` is below 86_400_000, so every field fits in u32.
        let in_day = in_day as u32;
        Self {
            year,
            month,
            day,
            hour: in_day / 3_600_000,
            minute: in_day / 60_000 % 60,
            second: in_day / 1_000 % 60,
            millis: in_day % 1_000,
        }
    }
}

/// Days since 1970-01-01 to a proleptic Gregorian `(year, month, day)`,
/// counted in 400-year eras of 146 097 days starting on March 1st.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * shifted_month + 2) / 5 + 1) as u32;
    let month = (if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    }) as u32;
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
