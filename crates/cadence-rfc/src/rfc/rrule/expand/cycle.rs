//! Per-cycle lookup tables.
//!
//! Masks are indexed by day-of-year (0-based) and padded with seven days of
//! the following January so weekly windows can run past December 31.

use chrono::{Datelike, NaiveDate};

use super::counter::Counter;
use super::dateutil::{days_in_month, days_in_year, from_ordinal, to_ordinal};
use super::easter::easter_mask;
use crate::rfc::rrule::core::Frequency;
use crate::rfc::rrule::core::resolve::ResolvedRules;

/// Days (0-based day-of-year) a single cycle may produce.
///
/// Filtering clears entries in place; positions keep their index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DaySet {
    pub days: Vec<Option<usize>>,
    pub start: usize,
    pub end: usize,
}

impl DaySet {
    fn span(len: usize, start: usize, end: usize) -> Self {
        let mut days = vec![None; len];
        for (index, slot) in days.iter_mut().enumerate().take(end).skip(start) {
            *slot = Some(index);
        }
        Self { days, start, end }
    }

    /// Surviving day indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.days
            .get(self.start..self.end)
            .unwrap_or_default()
            .iter()
            .flatten()
            .copied()
    }
}

/// Lookup tables for one (year, month) pair.
#[derive(Debug, Clone)]
pub(crate) struct CycleInfo {
    pub year: i32,
    pub month: u32,
    pub year_len: usize,
    pub next_year_len: usize,
    /// Ordinal of January 1st.
    pub year_ordinal: i32,
    pub month_mask: Vec<u32>,
    pub month_day_mask: Vec<i32>,
    pub neg_month_day_mask: Vec<i32>,
    /// Monday = 0.
    pub weekday_mask: Vec<u32>,
    /// Start index of each month; entry 12 is the year length.
    pub month_range: [usize; 13],
    pub week_no_mask: Option<Vec<bool>>,
    pub nth_weekday_mask: Option<Vec<bool>>,
    pub easter_mask: Option<Vec<usize>>,
}

impl CycleInfo {
    /// ## Summary
    /// Builds the tables for `year` and `month`.
    ///
    /// Returns `None` when the year cannot be represented.
    pub fn build(year: i32, month: u32, freq: Frequency, rules: &ResolvedRules) -> Option<Self> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let year_len = usize::try_from(days_in_year(year)).ok()?;
        let next_year_len = usize::try_from(days_in_year(year.checked_add(1)?)).ok()?;
        let padded_len = year_len + 7;

        let mut month_mask = Vec::with_capacity(padded_len);
        let mut month_day_mask = Vec::with_capacity(padded_len);
        let mut neg_month_day_mask = Vec::with_capacity(padded_len);
        let mut month_range = [0_usize; 13];

        for (index, m) in (1..=12_u32).enumerate() {
            let len = i32::try_from(days_in_month(year, m)).ok()?;
            for day in 1..=len {
                month_mask.push(m);
                month_day_mask.push(day);
                neg_month_day_mask.push(day - len - 1);
            }
            month_range[index + 1] = month_range[index] + usize::try_from(len).ok()?;
        }
        // First week of the following January
        for day in 1..=7 {
            month_mask.push(1);
            month_day_mask.push(day);
            neg_month_day_mask.push(day - 32);
        }

        let year_weekday = usize::try_from(jan1.weekday().num_days_from_monday()).ok()?;
        let weekday_mask: Vec<u32> = (0..7_u32)
            .cycle()
            .skip(year_weekday)
            .take(padded_len)
            .collect();

        let week_no_mask = rules.by_week_no.as_deref().map(|week_nos| {
            week_number_mask(week_nos, year, &weekday_mask, year_len, rules.wkst)
        });

        let nth_weekday_mask = rules.by_nweekday.as_deref().and_then(|nweekdays| {
            let ranges: Vec<(usize, usize)> = match freq {
                Frequency::Yearly => match rules.by_month.as_deref() {
                    Some(months) => months
                        .iter()
                        .filter_map(|m| usize::try_from(*m).ok())
                        .filter_map(|m| Some((*month_range.get(m.checked_sub(1)?)?, *month_range.get(m)?)))
                        .collect(),
                    None => vec![(0, year_len)],
                },
                Frequency::Monthly => {
                    let m = usize::try_from(month).ok()?;
                    vec![(*month_range.get(m.checked_sub(1)?)?, *month_range.get(m)?)]
                }
                Frequency::Weekly
                | Frequency::Daily
                | Frequency::Hourly
                | Frequency::Minutely
                | Frequency::Secondly => return None,
            };
            Some(nth_weekday_mask(nweekdays, &ranges, &weekday_mask, year_len))
        });

        let easter_mask = rules
            .by_easter
            .as_deref()
            .map(|offsets| easter_mask(year, offsets));

        Some(Self {
            year,
            month,
            year_len,
            next_year_len,
            year_ordinal: to_ordinal(jan1),
            month_mask,
            month_day_mask,
            neg_month_day_mask,
            weekday_mask,
            month_range,
            week_no_mask,
            nth_weekday_mask,
            easter_mask,
        })
    }

    /// The (year, month) pair these tables were built for.
    pub fn key(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Calendar date of day-of-year index `day`.
    pub fn date_at(&self, day: usize) -> Option<NaiveDate> {
        from_ordinal(self.year_ordinal.checked_add(i32::try_from(day).ok()?)?)
    }

    /// ## Summary
    /// Returns the days one cycle of `freq` covers around `counter`.
    ///
    /// Yearly cycles span the whole year and monthly cycles the counter's
    /// month. Weekly cycles run from the counter's day until the day before
    /// the next `wkst`. Finer frequencies cover the counter's day only.
    pub fn day_set(&self, freq: Frequency, counter: &Counter, wkst: u32) -> Option<DaySet> {
        match freq {
            Frequency::Yearly => Some(DaySet::span(self.year_len, 0, self.year_len)),
            Frequency::Monthly => {
                let m = usize::try_from(counter.month).ok()?;
                let start = *self.month_range.get(m.checked_sub(1)?)?;
                let end = *self.month_range.get(m)?;
                Some(DaySet::span(self.year_len, start, end))
            }
            Frequency::Weekly => {
                let start = self.day_index(counter)?;
                let mut days = vec![None; self.year_len + 7];
                let mut i = start;
                for _ in 0..7 {
                    *days.get_mut(i)? = Some(i);
                    i += 1;
                    if self.weekday_mask.get(i).is_none_or(|weekday| *weekday == wkst) {
                        break;
                    }
                }
                Some(DaySet {
                    days,
                    start,
                    end: i,
                })
            }
            Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                let day = self.day_index(counter)?;
                Some(DaySet::span(self.year_len, day, day + 1))
            }
        }
    }

    fn day_index(&self, counter: &Counter) -> Option<usize> {
        let ordinal = to_ordinal(counter.date()?);
        usize::try_from(ordinal.checked_sub(self.year_ordinal)?).ok()
    }
}

/// Marks the days falling into the requested week numbers.
///
/// Week 1 is the first week holding at least four days of the year, with
/// weeks starting on `wkst`. Days of the previous year's last week and the
/// next year's first week are marked too when requested.
fn week_number_mask(
    week_nos: &[i32],
    year: i32,
    weekday_mask: &[u32],
    year_len: usize,
    wkst: u32,
) -> Vec<bool> {
    let mut mask = vec![false; weekday_mask.len()];
    let (Ok(year_len_i), Some(&year_weekday)) = (i64::try_from(year_len), weekday_mask.first())
    else {
        return mask;
    };
    let wkst_i = i64::from(wkst);
    let year_weekday = i64::from(year_weekday);

    let first_wkst = (7 - year_weekday + wkst_i).rem_euclid(7);
    let (no1_wkst, week_year_len) = if first_wkst >= 4 {
        (0, year_len_i + (year_weekday - wkst_i).rem_euclid(7))
    } else {
        (first_wkst, year_len_i - first_wkst)
    };
    let num_weeks = week_year_len / 7 + (week_year_len % 7) / 4;

    let week_start = |n: i64| {
        if n > 1 {
            let i = no1_wkst + (n - 1) * 7;
            if no1_wkst == first_wkst { i } else { i - (7 - first_wkst) }
        } else {
            no1_wkst
        }
    };

    for n in week_nos.iter().map(|n| i64::from(*n)) {
        let n = if n < 0 { n + num_weeks + 1 } else { n };
        if !(1..=num_weeks).contains(&n) {
            continue;
        }
        mark_week(&mut mask, weekday_mask, week_start(n), wkst);
    }

    if week_nos.contains(&1) {
        // Week 1 of next year may start in this one
        let mut i = no1_wkst + num_weeks * 7;
        if no1_wkst != first_wkst {
            i -= 7 - first_wkst;
        }
        if i < year_len_i {
            mark_week(&mut mask, weekday_mask, i, wkst);
        }
    }

    if no1_wkst != 0 {
        // Leading days belong to the last week of the previous year
        let last_year_weeks = if week_nos.contains(&-1) {
            -1
        } else {
            let last_year = year - 1;
            let last_year_weekday = NaiveDate::from_ymd_opt(last_year, 1, 1)
                .map_or(0, |d| i64::from(d.weekday().num_days_from_monday()));
            let last_no1_wkst = (7 - last_year_weekday + wkst_i).rem_euclid(7);
            let last_year_len = i64::from(days_in_year(last_year));
            if last_no1_wkst >= 4 {
                52 + (last_year_len + (last_year_weekday - wkst_i).rem_euclid(7)) % 7 / 4
            } else {
                52 + (year_len_i - no1_wkst) % 7 / 4
            }
        };
        if week_nos.iter().any(|n| i64::from(*n) == last_year_weeks) {
            for slot in mask.iter_mut().take(usize::try_from(no1_wkst).unwrap_or(0)) {
                *slot = true;
            }
        }
    }

    mask
}

fn mark_week(mask: &mut [bool], weekday_mask: &[u32], start: i64, wkst: u32) {
    let Ok(mut i) = usize::try_from(start) else {
        return;
    };
    for _ in 0..7 {
        let Some(slot) = mask.get_mut(i) else {
            return;
        };
        *slot = true;
        i += 1;
        if weekday_mask.get(i).is_none_or(|weekday| *weekday == wkst) {
            return;
        }
    }
}

/// Marks the n-th weekday occurrences inside each `[first, end)` range.
fn nth_weekday_mask(
    nweekdays: &[(u32, i32)],
    ranges: &[(usize, usize)],
    weekday_mask: &[u32],
    year_len: usize,
) -> Vec<bool> {
    let mut mask = vec![false; year_len];

    for &(first, end) in ranges {
        let (Ok(first), Ok(end)) = (i64::try_from(first), i64::try_from(end)) else {
            continue;
        };
        let last = end - 1;
        for &(weekday, n) in nweekdays {
            let weekday = i64::from(weekday);
            let n = i64::from(n);
            let anchor = if n < 0 { last + (n + 1) * 7 } else { first + (n - 1) * 7 };
            if !(first..=last).contains(&anchor) {
                continue;
            }
            let Some(anchor_weekday) = usize::try_from(anchor)
                .ok()
                .and_then(|i| weekday_mask.get(i))
                .map(|wd| i64::from(*wd))
            else {
                continue;
            };
            let i = if n < 0 {
                anchor - (anchor_weekday - weekday).rem_euclid(7)
            } else {
                anchor + (7 - anchor_weekday + weekday).rem_euclid(7)
            };
            if (first..=last).contains(&i)
                && let Some(slot) = usize::try_from(i).ok().and_then(|i| mask.get_mut(i))
            {
                *slot = true;
            }
        }
    }

    mask
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
