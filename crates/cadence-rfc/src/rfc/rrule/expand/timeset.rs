//! Times of day produced by each cycle.

use chrono::NaiveTime;

use super::counter::Counter;
use crate::rfc::rrule::core::Frequency;
use crate::rfc::rrule::core::resolve::{ResolvedRules, admits};

/// ## Summary
/// Returns the sorted times of day for the cycle at `counter`.
///
/// Daily and coarser rules use the cross product of the hour, minute and
/// second sets. Sub-daily rules keep the counter's own fields down to their
/// frequency and expand only the finer sets; the result is empty when the
/// counter sits on a disallowed hour, minute or second.
pub(crate) fn timeset(
    freq: Frequency,
    rules: &ResolvedRules,
    counter: &Counter,
    nanos: u32,
) -> Vec<NaiveTime> {
    let hours = rules.by_hour.as_deref().unwrap_or_default();
    let minutes = rules.by_minute.as_deref().unwrap_or_default();
    let seconds = rules.by_second.as_deref().unwrap_or_default();

    if freq.is_daily_or_coarser() {
        return cross_product(hours, minutes, seconds, nanos);
    }

    let (Ok(hour), Ok(minute), Ok(second)) = (
        u32::try_from(counter.hour),
        u32::try_from(counter.minute),
        u32::try_from(counter.second),
    ) else {
        return Vec::new();
    };

    let hour_ok = admits(rules.by_hour.as_deref(), hour);
    let minute_ok = admits(rules.by_minute.as_deref(), minute);
    let second_ok = admits(rules.by_second.as_deref(), second);

    match freq {
        Frequency::Hourly if hour_ok => cross_product(&[hour], minutes, seconds, nanos),
        Frequency::Minutely if hour_ok && minute_ok => {
            cross_product(&[hour], &[minute], seconds, nanos)
        }
        Frequency::Secondly if hour_ok && minute_ok && second_ok => {
            cross_product(&[hour], &[minute], &[second], nanos)
        }
        Frequency::Yearly
        | Frequency::Monthly
        | Frequency::Weekly
        | Frequency::Daily
        | Frequency::Hourly
        | Frequency::Minutely
        | Frequency::Secondly => Vec::new(),
    }
}

fn cross_product(hours: &[u32], minutes: &[u32], seconds: &[u32], nanos: u32) -> Vec<NaiveTime> {
    let mut times: Vec<NaiveTime> = hours
        .iter()
        .flat_map(|h| {
            minutes.iter().flat_map(move |m| {
                seconds
                    .iter()
                    .filter_map(move |s| NaiveTime::from_hms_nano_opt(*h, *m, *s, nanos))
            })
        })
        .collect();
    times.sort_unstable();
    times
}
