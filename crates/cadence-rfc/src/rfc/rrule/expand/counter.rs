//! Raw date-time counter stepped once per cycle.

use cadence_core::constants::MAX_YEAR;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::dateutil::days_in_month;
use crate::rfc::rrule::core::Frequency;
use crate::rfc::rrule::core::resolve::{ResolvedRules, admits};

/// Calendar fields advanced by the interval.
///
/// Fields may briefly overflow their calendar range while stepping; every
/// public method leaves them normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Counter {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

impl Counter {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            year: i64::from(start.year()),
            month: i64::from(start.month()),
            day: i64::from(start.day()),
            hour: i64::from(start.hour()),
            minute: i64::from(start.minute()),
            second: i64::from(start.second()),
        }
    }

    /// Calendar date, if the fields form a valid one.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::try_from(self.year).ok()?,
            u32::try_from(self.month).ok()?,
            u32::try_from(self.day).ok()?,
        )
    }

    /// The (year, month) pair selecting the cycle tables.
    pub fn cycle_key(&self) -> Option<(i32, u32)> {
        Some((i32::try_from(self.year).ok()?, u32::try_from(self.month).ok()?))
    }

    pub fn past_max_year(&self) -> bool {
        self.year > i64::from(MAX_YEAR)
    }

    /// ## Summary
    /// Moves the counter to the next cycle.
    ///
    /// `filtered` tells sub-daily frequencies that the current day was
    /// rejected, so they may skip straight to the next day.
    ///
    /// Returns `false` when no allowed time of day can be reached.
    pub fn advance(
        &mut self,
        freq: Frequency,
        interval: u32,
        rules: &ResolvedRules,
        filtered: bool,
    ) -> bool {
        let interval = i64::from(interval);

        match freq {
            Frequency::Yearly => self.year += interval,
            Frequency::Monthly => {
                let months = self.month - 1 + interval;
                self.year += months.div_euclid(12);
                self.month = months.rem_euclid(12) + 1;
            }
            Frequency::Weekly => {
                let Some(date) = self.date() else {
                    return false;
                };
                let weekday = i64::from(date.weekday().num_days_from_monday());
                let wkst = i64::from(rules.wkst);
                // Back to the week start, then forward by whole weeks
                self.day += if wkst > weekday {
                    -(weekday + 1 + (6 - wkst)) + interval * 7
                } else {
                    -(weekday - wkst) + interval * 7
                };
                self.fix_day();
            }
            Frequency::Daily => {
                self.day += interval;
                self.fix_day();
            }
            Frequency::Hourly => return self.advance_hours(interval, rules, filtered),
            Frequency::Minutely => return self.advance_minutes(interval, rules, filtered),
            Frequency::Secondly => return self.advance_seconds(interval, rules, filtered),
        }
        true
    }

    fn advance_hours(&mut self, interval: i64, rules: &ResolvedRules, filtered: bool) -> bool {
        if filtered {
            self.hour += ((23 - self.hour) / interval) * interval;
        }
        let Some((days, hour)) = step(self.hour, interval, 24, rules.by_hour.as_deref()) else {
            return false;
        };
        self.hour = hour;
        self.add_days(days);
        true
    }

    fn advance_minutes(&mut self, interval: i64, rules: &ResolvedRules, filtered: bool) -> bool {
        if filtered {
            self.minute += ((1439 - (self.hour * 60 + self.minute)) / interval) * interval;
        }
        for _ in 0..repetitions(interval, 1440) {
            let Some((hours, minute)) = step(self.minute, interval, 60, rules.by_minute.as_deref())
            else {
                return false;
            };
            self.minute = minute;
            let hours = self.hour + hours;
            self.hour = hours.rem_euclid(24);
            self.add_days(hours.div_euclid(24));
            if admits_field(rules.by_hour.as_deref(), self.hour) {
                return true;
            }
        }
        false
    }

    fn advance_seconds(&mut self, interval: i64, rules: &ResolvedRules, filtered: bool) -> bool {
        if filtered {
            let elapsed = self.hour * 3600 + self.minute * 60 + self.second;
            self.second += ((86_399 - elapsed) / interval) * interval;
        }
        for _ in 0..repetitions(interval, 86_400) {
            let Some((minutes, second)) = step(self.second, interval, 60, rules.by_second.as_deref())
            else {
                return false;
            };
            self.second = second;
            let minutes = self.minute + minutes;
            self.minute = minutes.rem_euclid(60);
            let hours = self.hour + minutes.div_euclid(60);
            self.hour = hours.rem_euclid(24);
            self.add_days(hours.div_euclid(24));
            if admits_field(rules.by_hour.as_deref(), self.hour)
                && admits_field(rules.by_minute.as_deref(), self.minute)
            {
                return true;
            }
        }
        false
    }

    fn add_days(&mut self, days: i64) {
        if days > 0 {
            self.day += days;
            self.fix_day();
        }
    }

    /// Carries day overflow into months and years.
    fn fix_day(&mut self) {
        while !self.past_max_year() {
            let (Ok(year), Ok(month)) = (i32::try_from(self.year), u32::try_from(self.month)) else {
                return;
            };
            let len = i64::from(days_in_month(year, month));
            if self.day <= len {
                return;
            }
            self.day -= len;
            self.month += 1;
            if self.month > 12 {
                self.month = 1;
                self.year += 1;
            }
        }
    }
}

/// Steps `value` by `interval` modulo `base` until it lands in `allowed`.
///
/// Returns the carry into the next-larger unit and the new value, or `None`
/// if one full revolution never hits an allowed value.
fn step(value: i64, interval: i64, base: i64, allowed: Option<&[u32]>) -> Option<(i64, i64)> {
    let Some(allowed) = allowed else {
        let next = value + interval;
        return Some((next.div_euclid(base), next.rem_euclid(base)));
    };

    let mut carry = 0;
    let mut value = value;
    for _ in 0..base {
        let next = value + interval;
        carry += next.div_euclid(base);
        value = next.rem_euclid(base);
        if admits_field(Some(allowed), value) {
            return Some((carry, value));
        }
    }
    None
}

fn admits_field(allowed: Option<&[u32]>, value: i64) -> bool {
    u32::try_from(value).is_ok_and(|value| admits(allowed, value))
}

/// Steps after which a sub-daily counter returns to the same time of day.
fn repetitions(interval: i64, period: i64) -> i64 {
    period / gcd(interval, period)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}
