//! Calendar arithmetic used by the expansion engine.
//!
//! Ordinals count days from 0001-01-01 (ordinal 1) in the proleptic
//! Gregorian calendar, matching chrono's `num_days_from_ce`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Calendar unit for whole-unit differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Day,
    Week,
    Month,
    Year,
}

#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`. Returns 0 for invalid months.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[must_use]
pub const fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

#[must_use]
pub fn to_ordinal(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

/// Inverse of [`to_ordinal`]; `None` outside chrono's supported range.
#[must_use]
pub fn from_ordinal(ordinal: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(ordinal)
}

#[must_use]
pub fn combine(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    NaiveDateTime::new(date, time)
}

/// ISO 8601 week number (1-53). BYWEEKNO with `WKST=MO` numbers weeks the
/// same way.
#[must_use]
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// ## Summary
/// Counts the whole `unit`s elapsed from `earlier` to `later`.
///
/// Partial trailing units are not counted. Months honour day-of-month and
/// time of day, so Jan 31 to Feb 28 is zero whole months. The result is
/// negative when `later` precedes `earlier`.
#[must_use]
pub fn units_between(later: NaiveDateTime, earlier: NaiveDateTime, unit: CalendarUnit) -> i64 {
    if later < earlier {
        return -units_between(earlier, later, unit);
    }

    match unit {
        CalendarUnit::Day => later.signed_duration_since(earlier).num_days(),
        CalendarUnit::Week => later.signed_duration_since(earlier).num_weeks(),
        CalendarUnit::Month => whole_months(later, earlier),
        CalendarUnit::Year => whole_months(later, earlier) / 12,
    }
}

/// ## Summary
/// Advances `start` by `amount` whole units.
///
/// Month and year steps clamp the day to the end of the target month.
/// Returns `None` when the result leaves chrono's range.
#[must_use]
pub fn add_units(start: NaiveDateTime, unit: CalendarUnit, amount: u32) -> Option<NaiveDateTime> {
    match unit {
        CalendarUnit::Day => start.checked_add_signed(TimeDelta::try_days(i64::from(amount))?),
        CalendarUnit::Week => start.checked_add_signed(TimeDelta::try_weeks(i64::from(amount))?),
        CalendarUnit::Month => start.checked_add_months(chrono::Months::new(amount)),
        CalendarUnit::Year => {
            start.checked_add_months(chrono::Months::new(amount.checked_mul(12)?))
        }
    }
}

fn whole_months(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    let months = (i64::from(later.year()) - i64::from(earlier.year())) * 12
        + i64::from(later.month())
        - i64::from(earlier.month());

    if (later.day(), later.time()) < (earlier.day(), earlier.time()) {
        months - 1
    } else {
        months
    }
}
