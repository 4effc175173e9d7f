//! Recurrence rule builder and the validated spec consumed by the engine.

use chrono::{NaiveDateTime, Timelike};

use super::resolve::{ResolvedRules, resolve};
use super::{Frequency, Weekday, WeekdayNum};
use crate::error::{RfcResult, SpecError};
use crate::rfc::rrule::timezone::resolve_tzid;

/// `BYxxx` constraint lists (RFC 5545 §3.3.10).
///
/// `None` imposes no constraint. `Some` must hold at least one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByRules {
    /// By-month list (1-12).
    pub by_month: Option<Vec<u8>>,

    /// By-monthday list (-31 to 31, excluding 0).
    pub by_month_day: Option<Vec<i8>>,

    /// By-yearday list (-366 to 366, excluding 0).
    pub by_year_day: Option<Vec<i16>>,

    /// By-weekno list (-53 to 53, excluding 0).
    pub by_week_no: Option<Vec<i8>>,

    /// By-day list with optional occurrence numbers.
    pub by_day: Option<Vec<WeekdayNum>>,

    /// By-hour list (0-23).
    pub by_hour: Option<Vec<u8>>,

    /// By-minute list (0-59).
    pub by_minute: Option<Vec<u8>>,

    /// By-second list (0-59).
    pub by_second: Option<Vec<u8>>,

    /// By-setpos list (-366 to 366, excluding 0).
    /// Selects positions within each cycle after all other filters.
    pub by_set_pos: Option<Vec<i16>>,

    /// Day offsets from Easter Sunday (-366 to 366).
    pub by_easter: Option<Vec<i16>>,
}

/// Unvalidated recurrence rule.
///
/// Call [`RecurrenceRule::validate`] to obtain a [`RecurrenceSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,

    /// First candidate instant; nothing earlier is ever emitted.
    pub dtstart: NaiveDateTime,

    /// Cycle stride. Zero produces no occurrences.
    pub interval: u32,

    /// Inclusive end bound (mutually exclusive with count).
    pub until: Option<NaiveDateTime>,

    /// Number of occurrences (mutually exclusive with until).
    pub count: Option<u32>,

    /// Week start day (default: Monday).
    pub wkst: Weekday,

    /// Timezone the generated wall-clock times belong to.
    pub tzid: Option<String>,

    pub by: ByRules,
}

impl RecurrenceRule {
    /// Creates a rule with interval 1, no bounds and no constraints.
    #[must_use]
    pub fn new(freq: Frequency, dtstart: NaiveDateTime) -> Self {
        Self {
            freq,
            dtstart,
            interval: 1,
            until: None,
            count: None,
            wkst: Weekday::Monday,
            tzid: None,
            by: ByRules::default(),
        }
    }

    #[must_use]
    pub fn yearly(dtstart: NaiveDateTime) -> Self {
        Self::new(Frequency::Yearly, dtstart)
    }

    #[must_use]
    pub fn monthly(dtstart: NaiveDateTime) -> Self {
        Self::new(Frequency::Monthly, dtstart)
    }

    #[must_use]
    pub fn weekly(dtstart: NaiveDateTime) -> Self {
        Self::new(Frequency::Weekly, dtstart)
    }

    #[must_use]
    pub fn daily(dtstart: NaiveDateTime) -> Self {
        Self::new(Frequency::Daily, dtstart)
    }

    #[must_use]
    pub fn hourly(dtstart: NaiveDateTime) -> Self {
        Self::new(Frequency::Hourly, dtstart)
    }

    #[must_use]
    pub fn minutely(dtstart: NaiveDateTime) -> Self {
        Self::new(Frequency::Minutely, dtstart)
    }

    #[must_use]
    pub fn secondly(dtstart: NaiveDateTime) -> Self {
        Self::new(Frequency::Secondly, dtstart)
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the count.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self.until = None; // Mutually exclusive
        self
    }

    /// Sets the until date-time.
    #[must_use]
    pub fn with_until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self.count = None; // Mutually exclusive
        self
    }

    /// Sets the week start day.
    #[must_use]
    pub fn with_wkst(mut self, wkst: Weekday) -> Self {
        self.wkst = wkst;
        self
    }

    /// Sets the timezone identifier.
    #[must_use]
    pub fn with_tzid(mut self, tzid: impl Into<String>) -> Self {
        self.tzid = Some(tzid.into());
        self
    }

    #[must_use]
    pub fn with_by_month(mut self, months: Vec<u8>) -> Self {
        self.by.by_month = Some(months);
        self
    }

    #[must_use]
    pub fn with_by_month_day(mut self, days: Vec<i8>) -> Self {
        self.by.by_month_day = Some(days);
        self
    }

    #[must_use]
    pub fn with_by_year_day(mut self, days: Vec<i16>) -> Self {
        self.by.by_year_day = Some(days);
        self
    }

    #[must_use]
    pub fn with_by_week_no(mut self, weeks: Vec<i8>) -> Self {
        self.by.by_week_no = Some(weeks);
        self
    }

    #[must_use]
    pub fn with_by_day(mut self, days: Vec<WeekdayNum>) -> Self {
        self.by.by_day = Some(days);
        self
    }

    #[must_use]
    pub fn with_by_hour(mut self, hours: Vec<u8>) -> Self {
        self.by.by_hour = Some(hours);
        self
    }

    #[must_use]
    pub fn with_by_minute(mut self, minutes: Vec<u8>) -> Self {
        self.by.by_minute = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_by_second(mut self, seconds: Vec<u8>) -> Self {
        self.by.by_second = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_by_set_pos(mut self, positions: Vec<i16>) -> Self {
        self.by.by_set_pos = Some(positions);
        self
    }

    #[must_use]
    pub fn with_by_easter(mut self, offsets: Vec<i16>) -> Self {
        self.by.by_easter = Some(offsets);
        self
    }

    /// ## Summary
    /// Checks every field against its documented domain and resolves the
    /// rule into an immutable [`RecurrenceSpec`].
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidSpec` if a constraint list is empty or holds
    /// an out-of-domain value, if both COUNT and UNTIL are set, if the
    /// timezone identifier is unknown, or if a sub-daily interval can never
    /// land on the requested hour/minute/second values.
    pub fn validate(self) -> RfcResult<RecurrenceSpec> {
        if self.count.is_some() && self.until.is_some() {
            return Err(SpecError::CountWithUntil.into());
        }

        let by = &self.by;
        check_list("BYMONTH", by.by_month.as_deref(), 1, 12, false)?;
        check_list("BYMONTHDAY", by.by_month_day.as_deref(), -31, 31, true)?;
        check_list("BYYEARDAY", by.by_year_day.as_deref(), -366, 366, true)?;
        check_list("BYWEEKNO", by.by_week_no.as_deref(), -53, 53, true)?;
        check_list("BYHOUR", by.by_hour.as_deref(), 0, 23, false)?;
        check_list("BYMINUTE", by.by_minute.as_deref(), 0, 59, false)?;
        check_list("BYSECOND", by.by_second.as_deref(), 0, 59, false)?;
        check_list("BYSETPOS", by.by_set_pos.as_deref(), -366, 366, true)?;
        check_list("BYEASTER", by.by_easter.as_deref(), -366, 366, false)?;

        if let Some(days) = by.by_day.as_deref() {
            if days.is_empty() {
                return Err(SpecError::EmptyConstraint { field: "BYDAY" }.into());
            }
            let ordinals: Vec<i8> = days.iter().filter_map(|day| day.ordinal).collect();
            check_values("BYDAY", &ordinals, -53, 53, true)?;
        }

        if let Some(tzid) = self.tzid.as_deref() {
            resolve_tzid(tzid).map_err(|_e| SpecError::UnknownTimezone(tzid.to_string()))?;
        }

        check_reachable(&self)?;

        let resolved = resolve(&self);
        Ok(RecurrenceSpec {
            rule: self,
            resolved,
        })
    }
}

/// Validated, fully-resolved recurrence rule.
///
/// Keeps the caller's rule verbatim next to the constraint set with the
/// start-derived defaults applied.
#[derive(Debug, Clone)]
pub struct RecurrenceSpec {
    rule: RecurrenceRule,
    resolved: ResolvedRules,
}

impl RecurrenceSpec {
    /// Returns the rule as it was validated.
    #[must_use]
    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    #[must_use]
    pub fn freq(&self) -> Frequency {
        self.rule.freq
    }

    #[must_use]
    pub fn dtstart(&self) -> NaiveDateTime {
        self.rule.dtstart
    }

    #[must_use]
    pub fn interval(&self) -> u32 {
        self.rule.interval
    }

    #[must_use]
    pub fn until(&self) -> Option<NaiveDateTime> {
        self.rule.until
    }

    #[must_use]
    pub fn count(&self) -> Option<u32> {
        self.rule.count
    }

    #[must_use]
    pub fn wkst(&self) -> Weekday {
        self.rule.wkst
    }

    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.rule.tzid.as_deref()
    }

    /// Constraints exactly as the caller supplied them.
    #[must_use]
    pub fn by(&self) -> &ByRules {
        &self.rule.by
    }

    pub(crate) fn resolved(&self) -> &ResolvedRules {
        &self.resolved
    }
}

impl TryFrom<RecurrenceRule> for RecurrenceSpec {
    type Error = crate::error::RfcError;

    fn try_from(rule: RecurrenceRule) -> Result<Self, Self::Error> {
        rule.validate()
    }
}

fn check_list<T>(
    field: &'static str,
    values: Option<&[T]>,
    min: i32,
    max: i32,
    reject_zero: bool,
) -> Result<(), SpecError>
where
    T: Copy + Into<i32>,
{
    match values {
        None => Ok(()),
        Some([]) => Err(SpecError::EmptyConstraint { field }),
        Some(values) => check_values(field, values, min, max, reject_zero),
    }
}

fn check_values<T>(
    field: &'static str,
    values: &[T],
    min: i32,
    max: i32,
    reject_zero: bool,
) -> Result<(), SpecError>
where
    T: Copy + Into<i32>,
{
    for value in values.iter().map(|v| (*v).into()) {
        if reject_zero && value == 0 {
            return Err(SpecError::ZeroValue { field });
        }
        if !(min..=max).contains(&value) {
            return Err(SpecError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Rejects sub-daily rules whose interval can never land on an allowed
/// time of day.
///
/// Counter positions repeat with the length of one day, so one full day of
/// steps covers every reachable position.
fn check_reachable(rule: &RecurrenceRule) -> Result<(), SpecError> {
    if rule.interval == 0 {
        return Ok(());
    }

    let by = &rule.by;
    let admits = |set: Option<&Vec<u8>>, value: u64| {
        set.is_none_or(|set| set.iter().any(|v| u64::from(*v) == value))
    };
    let start = &rule.dtstart;
    let interval = u64::from(rule.interval);

    let (field, reachable) = match rule.freq {
        Frequency::Yearly | Frequency::Monthly | Frequency::Weekly | Frequency::Daily => {
            return Ok(());
        }
        Frequency::Hourly => {
            if by.by_hour.is_none() {
                return Ok(());
            }
            let origin = u64::from(start.hour());
            let reachable =
                (1..=24).any(|step| admits(by.by_hour.as_ref(), (origin + step * interval) % 24));
            ("BYHOUR", reachable)
        }
        Frequency::Minutely => {
            if by.by_hour.is_none() && by.by_minute.is_none() {
                return Ok(());
            }
            let origin = u64::from(start.hour() * 60 + start.minute());
            let reachable = (1..=1440).any(|step| {
                let position = (origin + step * interval) % 1440;
                admits(by.by_hour.as_ref(), position / 60)
                    && admits(by.by_minute.as_ref(), position % 60)
            });
            ("BYHOUR/BYMINUTE", reachable)
        }
        Frequency::Secondly => {
            if by.by_hour.is_none() && by.by_minute.is_none() && by.by_second.is_none() {
                return Ok(());
            }
            let origin = u64::from(start.num_seconds_from_midnight());
            let reachable = (1..=86_400).any(|step| {
                let position = (origin + step * interval) % 86_400;
                admits(by.by_hour.as_ref(), position / 3600)
                    && admits(by.by_minute.as_ref(), position / 60 % 60)
                    && admits(by.by_second.as_ref(), position % 60)
            });
            ("BYHOUR/BYMINUTE/BYSECOND", reachable)
        }
    };

    if reachable {
        Ok(())
    } else {
        Err(SpecError::UnreachableTime {
            field,
            interval: rule.interval,
        })
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
