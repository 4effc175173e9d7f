//! Start-derived defaults and normalized constraint sets.
//!
//! RFC 5545 lets a rule omit the calendar fields that anchor it. The missing
//! values come from DTSTART: a plain `FREQ=MONTHLY` repeats on the start's
//! day of month, a plain `FREQ=WEEKLY` on the start's weekday, and so on.

use chrono::{Datelike, Timelike};

use super::{Frequency, RecurrenceRule, Weekday};

/// Constraint sets with defaults applied, sorted and de-duplicated.
///
/// Values are widened to `u32`/`i32` so they compare directly against
/// chrono fields and cycle masks. A set is never `Some` and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResolvedRules {
    pub by_month: Option<Vec<u32>>,
    /// Positive month days.
    pub by_month_day: Option<Vec<i32>>,
    /// Negative month days, counted from the end of the month.
    pub by_nmonth_day: Option<Vec<i32>>,
    pub by_year_day: Option<Vec<i32>>,
    pub by_week_no: Option<Vec<i32>>,
    /// Weekdays (Monday = 0) without an ordinal.
    pub by_weekday: Option<Vec<u32>>,
    /// `(weekday, ordinal)` pairs. Only yearly and monthly rules keep these.
    pub by_nweekday: Option<Vec<(u32, i32)>>,
    pub by_hour: Option<Vec<u32>>,
    pub by_minute: Option<Vec<u32>>,
    pub by_second: Option<Vec<u32>>,
    pub by_set_pos: Option<Vec<i32>>,
    pub by_easter: Option<Vec<i32>>,
    /// Week start (Monday = 0).
    pub wkst: u32,
}

pub(crate) fn resolve(rule: &RecurrenceRule) -> ResolvedRules {
    let by = &rule.by;
    let start = rule.dtstart;

    let mut by_month = widen(by.by_month.as_deref());
    let mut month_days = widen(by.by_month_day.as_deref());
    let mut weekdays: Option<Vec<(u32, Option<i32>)>> = by.by_day.as_ref().map(|days| {
        days.iter()
            .map(|day| {
                (
                    u32::from(day.weekday.days_from_monday()),
                    day.ordinal.map(i32::from),
                )
            })
            .collect()
    });

    let anchored = by.by_week_no.is_some()
        || by.by_year_day.is_some()
        || by.by_month_day.is_some()
        || by.by_day.is_some()
        || by.by_easter.is_some();

    if !anchored {
        match rule.freq {
            Frequency::Yearly => {
                if by_month.is_none() {
                    by_month = Some(vec![start.month()]);
                }
                month_days = Some(vec![start_day(rule)]);
            }
            Frequency::Monthly => month_days = Some(vec![start_day(rule)]),
            Frequency::Weekly => {
                let weekday = Weekday::from(start.weekday());
                weekdays = Some(vec![(u32::from(weekday.days_from_monday()), None)]);
            }
            Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {}
        }
    }

    let (by_month_day, by_nmonth_day) = match month_days {
        Some(days) => {
            let (positive, negative): (Vec<i32>, Vec<i32>) = days.into_iter().partition(|d| *d > 0);
            (non_empty(positive), non_empty(negative))
        }
        None => (None, None),
    };

    // Occurrence numbers only mean something inside a month or a year
    let keeps_ordinals = matches!(rule.freq, Frequency::Yearly | Frequency::Monthly);
    let (by_weekday, by_nweekday) = match weekdays {
        Some(days) => {
            let mut plain = Vec::new();
            let mut nth = Vec::new();
            for (weekday, ordinal) in days {
                match ordinal {
                    Some(n) if keeps_ordinals => nth.push((weekday, n)),
                    Some(_) | None => plain.push(weekday),
                }
            }
            (non_empty(plain), non_empty(nth))
        }
        None => (None, None),
    };

    let by_hour = widen(by.by_hour.as_deref())
        .or_else(|| (rule.freq > Frequency::Hourly).then(|| vec![start.hour()]));
    let by_minute = widen(by.by_minute.as_deref())
        .or_else(|| (rule.freq > Frequency::Minutely).then(|| vec![start.minute()]));
    let by_second = widen(by.by_second.as_deref())
        .or_else(|| (rule.freq > Frequency::Secondly).then(|| vec![start.second()]));

    ResolvedRules {
        by_month: normalized(by_month),
        by_month_day: normalized(by_month_day),
        by_nmonth_day: normalized(by_nmonth_day),
        by_year_day: normalized(widen(by.by_year_day.as_deref())),
        by_week_no: normalized(widen(by.by_week_no.as_deref())),
        by_weekday: normalized(by_weekday),
        by_nweekday: normalized(by_nweekday),
        by_hour: normalized(by_hour),
        by_minute: normalized(by_minute),
        by_second: normalized(by_second),
        by_set_pos: normalized(widen(by.by_set_pos.as_deref())),
        by_easter: normalized(widen(by.by_easter.as_deref())),
        wkst: u32::from(rule.wkst.days_from_monday()),
    }
}

/// `true` when `value` passes an optional constraint set.
pub(crate) fn admits(allowed: Option<&[u32]>, value: u32) -> bool {
    allowed.is_none_or(|allowed| allowed.contains(&value))
}

fn start_day(rule: &RecurrenceRule) -> i32 {
    i32::try_from(rule.dtstart.day()).unwrap_or(1)
}

fn widen<T, U>(values: Option<&[T]>) -> Option<Vec<U>>
where
    T: Copy + Into<U>,
{
    values.map(|values| values.iter().map(|v| (*v).into()).collect())
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

fn normalized<T: Ord>(values: Option<Vec<T>>) -> Option<Vec<T>> {
    values.and_then(|mut values| {
        values.sort_unstable();
        values.dedup();
        non_empty(values)
    })
}
