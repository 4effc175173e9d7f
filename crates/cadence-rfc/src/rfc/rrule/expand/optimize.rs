//! Start-bound optimization for bounded queries.
//!
//! A `between` or `after` query far past DTSTART would otherwise walk every
//! cycle from the start. For simple rules the cycles repeat on a fixed
//! calendar stride, so expansion can begin a whole number of intervals
//! later without changing which occurrences fall inside the query window.

use chrono::NaiveDateTime;

use super::dateutil::{CalendarUnit, add_units, units_between};
use crate::rfc::rrule::collect::{QueryMethod, ResultCollector};
use crate::rfc::rrule::core::{Frequency, RecurrenceSpec};

/// ## Summary
/// Returns the instant expansion should start from.
///
/// Falls back to DTSTART unless the rule is a plain daily, weekly, monthly
/// or yearly rule without COUNT and without constraints other than BYDAY,
/// and the collector has a lower bound past DTSTART. The effective start
/// stays one interval short of the bound.
pub(crate) fn effective_start<C>(spec: &RecurrenceSpec, collector: &C) -> NaiveDateTime
where
    C: ResultCollector + ?Sized,
{
    let dtstart = spec.dtstart();

    let Some(min_date) = collector.min_date() else {
        return dtstart;
    };
    if collector.method() == QueryMethod::Before || min_date < dtstart || spec.count().is_some() {
        return dtstart;
    }

    let by = spec.by();
    let constrained = by.by_set_pos.is_some()
        || by.by_month.is_some()
        || by.by_month_day.is_some()
        || by.by_year_day.is_some()
        || by.by_week_no.is_some()
        || by.by_hour.is_some()
        || by.by_minute.is_some()
        || by.by_second.is_some()
        || by.by_easter.is_some();
    if constrained {
        return dtstart;
    }

    let unit = match spec.freq() {
        Frequency::Daily => CalendarUnit::Day,
        Frequency::Weekly => CalendarUnit::Week,
        Frequency::Monthly => CalendarUnit::Month,
        Frequency::Yearly => CalendarUnit::Year,
        Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => return dtstart,
    };

    let interval = i64::from(spec.interval());
    if interval == 0 {
        return dtstart;
    }
    let cycles = units_between(min_date, dtstart, unit) / interval;
    if cycles < 2 {
        return dtstart;
    }

    let Some(amount) = (cycles - 1)
        .checked_mul(interval)
        .and_then(|amount| u32::try_from(amount).ok())
    else {
        return dtstart;
    };

    match add_units(dtstart, unit, amount) {
        Some(start) => {
            tracing::debug!(%dtstart, %start, cycles, "Skipping cycles before query bound");
            start
        }
        None => dtstart,
    }
}
