//! Jalali (Solar Hijri) calendar support

use crate::date::digits::fold_letters;
use chrono::NaiveDate;

/// Jalali month names in calendar order
pub const MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Returns the 1-based month number for an exact month name
pub fn month_number(name: &str) -> Option<u32> {
    let name = fold_letters(name);
    MONTHS
        .iter()
        .position(|m| fold_letters(m) == name)
        .map(|i| i as u32 + 1)
}

/// Converts a Jalali date to the Gregorian calendar
///
/// Returns `None` for out-of-range components (year < 1, month outside
/// 1..=12, day outside the month).
///
/// # Examples
///
/// ```
/// use blog_harvest::date::jalali_to_gregorian;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     jalali_to_gregorian(1395, 5, 15),
///     NaiveDate::from_ymd_opt(2016, 8, 5)
/// );
/// ```
pub fn jalali_to_gregorian(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if year < 1 || !(1..=12).contains(&month) || day < 1 || day > month_length(month) {
        return None;
    }

    let jy = i64::from(year) + 1595;
    let jm = i64::from(month);
    let jd = i64::from(day);

    let month_days = if jm < 7 {
        (jm - 1) * 31
    } else {
        (jm - 7) * 30 + 186
    };
    let mut days =
        -355_668 + 365 * jy + (jy / 33) * 8 + ((jy % 33) + 3) / 4 + jd + month_days;

    let mut gy = 400 * (days / 146_097);
    days %= 146_097;

    if days > 36_524 {
        days -= 1;
        gy += 100 * (days / 36_524);
        days %= 36_524;
        if days >= 365 {
            days += 1;
        }
    }

    gy += 4 * (days / 1_461);
    days %= 1_461;

    if days > 365 {
        gy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let gy = i32::try_from(gy).ok()?;
    let ordinal = u32::try_from(days + 1).ok()?;
    NaiveDate::from_yo_opt(gy, ordinal)
}

/// Longest possible length of a Jalali month
///
/// Esfand has 30 days only in leap years; it is accepted as 30 here and
/// the conversion rolls a non-leap Esfand 30 into Farvardin 1.
fn month_length(month: u32) -> u32 {
    if month <= 6 {
        31
    } else {
        30
    }
}
