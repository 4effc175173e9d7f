//! Main expansion loop.

use std::ops::ControlFlow;

use cadence_core::config::Settings;
use chrono::{NaiveDateTime, NaiveTime, Timelike};

use super::counter::Counter;
use super::cycle::{CycleInfo, DaySet};
use super::dateutil::combine;
use super::filter::remove_filtered;
use super::optimize::effective_start;
use super::poslist::select_positions;
use super::timeset::timeset;
use crate::error::RfcError;
use crate::rfc::rrule::collect::ResultCollector;
use crate::rfc::rrule::core::RecurrenceSpec;
use crate::rfc::rrule::timezone::Rezone;

/// Tunables for one expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionOptions {
    /// Start bounded queries near their lower bound.
    pub optimize_bounded_queries: bool,

    /// Move DST-gap wall-clock times to the end of the gap silently.
    /// Strict mode moves them too but warns.
    pub lenient_gaps: bool,

    /// Upper limit on occurrences materialized for unbounded queries.
    pub max_instances: usize,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            optimize_bounded_queries: settings.expansion.optimize_bounded_queries,
            lenient_gaps: settings.timezone.lenient_gaps,
            max_instances: settings.expansion.max_instances,
        }
    }
}

impl TryFrom<&Settings> for ExpansionOptions {
    type Error = RfcError;

    fn try_from(settings: &Settings) -> Result<Self, Self::Error> {
        settings.validate()?;
        Ok(Self {
            optimize_bounded_queries: settings.expansion.optimize_bounded_queries,
            lenient_gaps: settings.timezone.lenient_gaps,
            max_instances: settings.expansion.max_instances,
        })
    }
}

/// Why an expansion stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// COUNT or INTERVAL is zero.
    Empty,
    /// COUNT occurrences were emitted.
    CountReached,
    /// A candidate passed UNTIL.
    UntilPassed,
    /// The collector declined further occurrences.
    CollectorStopped,
    /// The counter moved past the last supported year.
    MaxYearExceeded,
    /// No further candidate could be formed.
    Exhausted,
}

/// ## Summary
/// Drives `spec` through its cycles and feeds every occurrence to
/// `collector`.
///
/// Candidates before DTSTART are dropped. Candidates of a zoned rule pass
/// through `rezoner` before the collector sees them. Expansion ends on the
/// first of: COUNT reached, UNTIL passed, collector refusal, or the counter
/// leaving the supported year range.
#[tracing::instrument(
    skip_all,
    fields(freq = %spec.freq(), dtstart = %spec.dtstart(), method = ?collector.method())
)]
pub fn expand<C, Z>(
    spec: &RecurrenceSpec,
    collector: &mut C,
    rezoner: &mut Z,
    options: &ExpansionOptions,
) -> Termination
where
    C: ResultCollector + ?Sized,
    Z: Rezone + ?Sized,
{
    if spec.count() == Some(0) || spec.interval() == 0 {
        tracing::debug!("Rule produces no occurrences");
        return Termination::Empty;
    }

    let start = if options.optimize_bounded_queries {
        effective_start(spec, collector)
    } else {
        spec.dtstart()
    };

    let mut expansion = Expansion {
        spec,
        collector,
        rezoner,
        remaining: spec.count(),
        emitted: 0,
    };
    let termination = match expansion.run(start) {
        ControlFlow::Break(reason) => reason,
        ControlFlow::Continue(()) => Termination::Exhausted,
    };

    tracing::debug!(?termination, emitted = expansion.emitted, "Expansion finished");
    termination
}

struct Expansion<'a, C: ?Sized, Z: ?Sized> {
    spec: &'a RecurrenceSpec,
    collector: &'a mut C,
    rezoner: &'a mut Z,
    remaining: Option<u32>,
    emitted: usize,
}

impl<C, Z> Expansion<'_, C, Z>
where
    C: ResultCollector + ?Sized,
    Z: Rezone + ?Sized,
{
    fn run(&mut self, start: NaiveDateTime) -> ControlFlow<Termination> {
        let spec = self.spec;
        let freq = spec.freq();
        let rules = spec.resolved();
        let nanos = spec.dtstart().nanosecond();

        let mut counter = Counter::new(start);
        let Some((year, month)) = counter.cycle_key() else {
            return ControlFlow::Break(Termination::Exhausted);
        };
        let Some(mut cycle) = CycleInfo::build(year, month, freq, rules) else {
            return ControlFlow::Break(Termination::Exhausted);
        };
        let mut times = timeset(freq, rules, &counter, nanos);

        loop {
            let Some(mut days) = cycle.day_set(freq, &counter, rules.wkst) else {
                return ControlFlow::Break(Termination::Exhausted);
            };
            let filtered = remove_filtered(&mut days, &cycle, rules);

            match rules.by_set_pos.as_deref() {
                Some(positions) if !times.is_empty() => {
                    for candidate in select_positions(positions, &days, &times, &cycle) {
                        self.emit(candidate)?;
                    }
                }
                Some(_) => {}
                None => self.emit_cycle(&cycle, &days, &times)?,
            }

            if !counter.advance(freq, spec.interval(), rules, filtered) {
                tracing::trace!("No reachable time of day left");
                return ControlFlow::Break(Termination::Exhausted);
            }
            if counter.past_max_year() {
                return ControlFlow::Break(Termination::MaxYearExceeded);
            }

            if !freq.is_daily_or_coarser() {
                times = timeset(freq, rules, &counter, nanos);
            }

            let Some(key) = counter.cycle_key() else {
                return ControlFlow::Break(Termination::Exhausted);
            };
            if key != cycle.key() {
                let Some(next) = CycleInfo::build(key.0, key.1, freq, rules) else {
                    return ControlFlow::Break(Termination::Exhausted);
                };
                tracing::trace!(year = key.0, month = key.1, "Rebuilt cycle tables");
                cycle = next;
            }
        }
    }

    fn emit_cycle(
        &mut self,
        cycle: &CycleInfo,
        days: &DaySet,
        times: &[NaiveTime],
    ) -> ControlFlow<Termination> {
        for day in days.iter() {
            let Some(date) = cycle.date_at(day) else {
                return ControlFlow::Break(Termination::Exhausted);
            };
            for time in times {
                self.emit(combine(date, *time))?;
            }
        }
        ControlFlow::Continue(())
    }

    fn emit(&mut self, candidate: NaiveDateTime) -> ControlFlow<Termination> {
        if self.spec.until().is_some_and(|until| candidate > until) {
            return ControlFlow::Break(Termination::UntilPassed);
        }
        if candidate < self.spec.dtstart() {
            return ControlFlow::Continue(());
        }

        let occurrence = match self.spec.tzid() {
            Some(tzid) => self.rezoner.rezone(candidate, tzid),
            None => candidate,
        };

        if !self.collector.accept(occurrence) {
            return ControlFlow::Break(Termination::CollectorStopped);
        }
        self.emitted += 1;

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                return ControlFlow::Break(Termination::CountReached);
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
#[path = "iter_tests.rs"]
mod tests;
