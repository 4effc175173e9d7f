//! Easter Sunday and the BYEASTER day offsets around it.

use chrono::{Datelike, NaiveDate};

use super::dateutil::days_in_year;

/// Western (Gregorian) Easter Sunday for `year`, via the anonymous
/// Gregorian algorithm.
pub(crate) fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Day-of-year indices (0-based) of Easter Sunday shifted by each offset.
///
/// Offsets landing outside `year` are dropped.
pub(crate) fn easter_mask(year: i32, offsets: &[i32]) -> Vec<usize> {
    let Some(easter) = easter_sunday(year) else {
        return Vec::new();
    };
    let easter_index = i64::from(easter.ordinal0());

    let mut mask: Vec<usize> = offsets
        .iter()
        .filter_map(|offset| usize::try_from(easter_index + i64::from(*offset)).ok())
        .filter(|index| usize::try_from(days_in_year(year)).is_ok_and(|len| *index < len))
        .collect();
    mask.sort_unstable();
    mask.dedup();
    mask
}
