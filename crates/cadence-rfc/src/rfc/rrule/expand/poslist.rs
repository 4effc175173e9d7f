//! BYSETPOS selection over one cycle's candidates.

use chrono::{NaiveDateTime, NaiveTime};

use super::cycle::{CycleInfo, DaySet};
use super::dateutil::combine;

/// ## Summary
/// Picks the 1-based `positions` out of the cycle's chronological
/// day × time candidates.
///
/// Negative positions count from the end. Positions outside the candidate
/// list are ignored. The selection comes back sorted without duplicates.
pub(crate) fn select_positions(
    positions: &[i32],
    days: &DaySet,
    times: &[NaiveTime],
    cycle: &CycleInfo,
) -> Vec<NaiveDateTime> {
    let candidates: Vec<NaiveDateTime> = days
        .iter()
        .filter_map(|day| cycle.date_at(day))
        .flat_map(|date| times.iter().map(move |time| combine(date, *time)))
        .collect();

    let Ok(len) = i64::try_from(candidates.len()) else {
        return Vec::new();
    };

    let mut selected: Vec<NaiveDateTime> = positions
        .iter()
        .map(|pos| i64::from(*pos))
        .filter_map(|pos| {
            let index = if pos > 0 { pos - 1 } else { len + pos };
            usize::try_from(index).ok()
        })
        .filter_map(|index| candidates.get(index).copied())
        .collect();
    selected.sort_unstable();
    selected.dedup();
    selected
}
