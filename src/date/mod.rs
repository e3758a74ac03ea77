//! Date normalization for blogfa post and comment dates
//!
//! Blogfa prints dates in the Jalali calendar with Persian digits, for example
//! `شنبه ۱۵ مرداد ۱۳۹۵ ۱۴:۳۰`. This module turns such strings into timestamps.
//! Normalization never fails: anything unparseable becomes the current time.

mod digits;
mod jalali;

pub use digits::to_ascii_digits;
pub use jalali::{jalali_to_gregorian, month_number, MONTHS};

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

/// Asia/Tehran, UTC+03:30
const TEHRAN_OFFSET_SECS: i32 = 210 * 60;

/// Converts localized date strings into timestamps in the blog's time zone
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    offset: FixedOffset,
}

impl DateNormalizer {
    /// Creates a normalizer that interprets dates in the given offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Creates a normalizer from an offset in minutes east of UTC
    ///
    /// Returns `None` if the offset is out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    /// The offset dates are interpreted in
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Normalizes a raw date string
    ///
    /// Empty or malformed input yields the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use blog_harvest::date::DateNormalizer;
    ///
    /// let normalizer = DateNormalizer::default();
    /// let date = normalizer.normalize("۱ فروردین ۱۳۹۵ ۱۰:۰۰");
    /// assert_eq!(date.to_rfc3339(), "2016-03-20T10:00:00+03:30");
    /// ```
    pub fn normalize(&self, raw: &str) -> DateTime<FixedOffset> {
        let parsed = parse_jalali(raw)
            .and_then(|naive| self.offset.from_local_datetime(&naive).single());

        match parsed {
            Some(date) => date,
            None => {
                if !raw.trim().is_empty() {
                    tracing::debug!("Unparseable date {:?}, using current time", raw.trim());
                }
                self.now()
            }
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new(FixedOffset::east_opt(TEHRAN_OFFSET_SECS).unwrap_or_else(|| Utc.fix()))
    }
}

/// Parses a Jalali date string into a local (Gregorian) date and time
///
/// Accepted shapes, after Persian digits are converted:
///
/// - `15 مرداد 1395`
/// - `15 مرداد 1395 14:30`
/// - `شنبه 15 مرداد 1395 ساعت 14:30` (leading weekday, any words before the time)
/// - `15 مرداد1395` (year glued to the month name)
///
/// Unparseable day or year tokens count as zero, which no date accepts, so the
/// result is `None`. A missing time of day means midnight; an impossible one
/// such as `25:00` also yields `None`.
pub fn parse_jalali(raw: &str) -> Option<NaiveDateTime> {
    let text = to_ascii_digits(raw.trim());
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    // A leading weekday name is skipped
    let rest = if tokens[0].parse::<u32>().is_err() {
        &tokens[1..]
    } else {
        &tokens[..]
    };

    let (day_token, month_token, tail) = match rest {
        [day, month, tail @ ..] => (*day, *month, tail),
        _ => return None,
    };

    let (month_name, year_token, tail) = split_year(month_token, tail);

    let day = day_token.parse::<u32>().unwrap_or(0);
    let year = year_token.and_then(|y| y.parse::<i32>().ok()).unwrap_or(0);
    let month = month_number(month_name)?;

    let date = jalali_to_gregorian(year, month, day)?;
    let time = match tail.iter().find(|t| t.contains(':')) {
        Some(clock) => parse_clock(clock)?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };

    Some(date.and_time(time))
}

/// Separates a year glued onto the month token, e.g. `مرداد1395`
///
/// Falls back to the next token as the year.
fn split_year<'a>(
    month_token: &'a str,
    tail: &'a [&'a str],
) -> (&'a str, Option<&'a str>, &'a [&'a str]) {
    let char_count = month_token.chars().count();
    if char_count > 4 {
        if let Some((split_at, _)) = month_token.char_indices().nth(char_count - 4) {
            let (name, year) = month_token.split_at(split_at);
            if year.parse::<i32>().is_ok() {
                return (name, Some(year), tail);
            }
        }
    }

    match tail {
        [year, rest @ ..] => (month_token, Some(*year), rest),
        [] => (month_token, None, tail),
    }
}

/// Parses `HH:MM`; `None` for anything that is not a real time of day
fn parse_clock(token: &str) -> Option<NaiveTime> {
    let (hour, minute) = token.split_once(':')?;
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}
