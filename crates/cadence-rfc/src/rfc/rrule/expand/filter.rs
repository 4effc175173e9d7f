//! Constraint filter applied to every day of a cycle.

use super::cycle::{CycleInfo, DaySet};
use crate::rfc::rrule::core::resolve::ResolvedRules;

/// ## Summary
/// Returns `true` when day-of-year index `day` violates a constraint.
///
/// BYDAY admits a day that matches either a plain weekday or an
/// occurrence-numbered weekday.
pub(crate) fn is_filtered(cycle: &CycleInfo, rules: &ResolvedRules, day: usize) -> bool {
    let (Some(&month), Some(&month_day), Some(&neg_month_day), Some(&weekday)) = (
        cycle.month_mask.get(day),
        cycle.month_day_mask.get(day),
        cycle.neg_month_day_mask.get(day),
        cycle.weekday_mask.get(day),
    ) else {
        return true;
    };

    if rules.by_month.as_ref().is_some_and(|months| !months.contains(&month)) {
        return true;
    }

    if cycle
        .week_no_mask
        .as_ref()
        .is_some_and(|mask| !mask.get(day).copied().unwrap_or(false))
    {
        return true;
    }

    if rules.by_weekday.is_some() || cycle.nth_weekday_mask.is_some() {
        let plain = rules
            .by_weekday
            .as_ref()
            .is_some_and(|weekdays| weekdays.contains(&weekday));
        let nth = cycle
            .nth_weekday_mask
            .as_ref()
            .is_some_and(|mask| mask.get(day).copied().unwrap_or(false));
        if !plain && !nth {
            return true;
        }
    }

    if cycle
        .easter_mask
        .as_ref()
        .is_some_and(|days| !days.contains(&day))
    {
        return true;
    }

    if (rules.by_month_day.is_some() || rules.by_nmonth_day.is_some())
        && !rules
            .by_month_day
            .as_ref()
            .is_some_and(|days| days.contains(&month_day))
        && !rules
            .by_nmonth_day
            .as_ref()
            .is_some_and(|days| days.contains(&neg_month_day))
    {
        return true;
    }

    if let Some(year_days) = rules.by_year_day.as_ref() {
        let (Ok(day), Ok(year_len), Ok(next_year_len)) = (
            i32::try_from(day),
            i32::try_from(cycle.year_len),
            i32::try_from(cycle.next_year_len),
        ) else {
            return true;
        };
        // Padding days count against the next year
        let (forward, backward) = if day < year_len {
            (day + 1, day - year_len)
        } else {
            (day + 1 - year_len, day - year_len - next_year_len)
        };
        if !year_days.contains(&forward) && !year_days.contains(&backward) {
            return true;
        }
    }

    false
}

/// Clears filtered days from `days`. Returns `true` if any were removed.
pub(crate) fn remove_filtered(days: &mut DaySet, cycle: &CycleInfo, rules: &ResolvedRules) -> bool {
    let mut removed = false;
    for slot in days.days.iter_mut().take(days.end).skip(days.start) {
        if let Some(day) = *slot
            && is_filtered(cycle, rules, day)
        {
            *slot = None;
            removed = true;
        }
    }
    removed
}
