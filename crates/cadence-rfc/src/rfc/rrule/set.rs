//! Recurrence sets combining RRULE, RDATE and EXDATE (RFC 5545 §3.8.5).

use cadence_core::constants::DEFAULT_MAX_INSTANCES;
use chrono::NaiveDateTime;

use super::collect::{CallbackIterResult, QueryWindow};
use super::core::RecurrenceSpec;
use super::expand::Expander;

/// ## Summary
/// A set of recurring instances, combining rules, additional dates, and
/// exceptions.
///
/// Additional and excluded dates are compared against expanded values as
/// they are emitted: UTC wall-clock for zoned rules, floating otherwise.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceSet {
    /// Validated recurrence rules.
    pub rules: Vec<RecurrenceSpec>,

    /// Additional recurrence dates (RDATE).
    pub rdates: Vec<NaiveDateTime>,

    /// Exception dates (EXDATE) - occurrences to exclude.
    pub exdates: Vec<NaiveDateTime>,

    /// Maximum number of instances to generate. Zero falls back to the
    /// default cap.
    pub max_instances: usize,
}

impl RecurrenceSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_instances: DEFAULT_MAX_INSTANCES,
            ..Self::default()
        }
    }

    /// Adds a recurrence rule.
    #[must_use]
    pub fn with_rule(mut self, rule: RecurrenceSpec) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an RDATE.
    #[must_use]
    pub fn with_rdate(mut self, rdate: NaiveDateTime) -> Self {
        self.rdates.push(rdate);
        self
    }

    /// Adds an EXDATE.
    #[must_use]
    pub fn with_exdate(mut self, exdate: NaiveDateTime) -> Self {
        self.exdates.push(exdate);
        self
    }

    /// Sets the maximum number of instances.
    #[must_use]
    pub fn with_max_instances(mut self, max: usize) -> Self {
        self.max_instances = max;
        self
    }

    /// ## Summary
    /// Expands the set within the half-open range `[range_start, range_end)`.
    ///
    /// Each rule is expanded through `expander`, so bounded ranges let the
    /// start-bound optimizer skip early cycles. The merged result is sorted,
    /// free of duplicates and excluded dates, and holds at most
    /// `max_instances` values.
    #[tracing::instrument(skip_all, fields(rules = self.rules.len(), ?range_start, ?range_end))]
    pub fn expand(
        &self,
        expander: &mut Expander,
        range_start: Option<NaiveDateTime>,
        range_end: Option<NaiveDateTime>,
    ) -> Vec<NaiveDateTime> {
        let cap = if self.max_instances == 0 {
            DEFAULT_MAX_INSTANCES
        } else {
            self.max_instances
        };

        let window = match (range_start, range_end) {
            (Some(start), Some(end)) => QueryWindow::between(start, end, true),
            (Some(start), None) => QueryWindow::between(start, NaiveDateTime::MAX, true),
            (None, Some(end)) => QueryWindow::before(end, false),
            (None, None) => QueryWindow::all(),
        };

        let mut instances = Vec::new();
        for spec in &self.rules {
            // Excluded dates pass through uncounted and are removed below
            let mut counted = 0;
            let mut collector = CallbackIterResult::new(window, |date, _| {
                if range_end.is_some_and(|end| date >= end) {
                    return false;
                }
                if !self.exdates.contains(&date) {
                    if counted == cap {
                        return false;
                    }
                    counted += 1;
                }
                true
            });
            expander.run(spec, &mut collector);
            instances.extend(collector.into_values());
        }

        instances.extend(self.rdates.iter().copied());
        instances.retain(|instance| !self.exdates.contains(instance));
        instances.retain(|instance| {
            let after_start = range_start.is_none_or(|start| *instance >= start);
            let before_end = range_end.is_none_or(|end| *instance < end);
            after_start && before_end
        });

        instances.sort_unstable();
        instances.dedup();
        if instances.len() > cap {
            tracing::debug!(found = instances.len(), cap, "Truncating recurrence set");
            instances.truncate(cap);
        }
        instances
    }
}
