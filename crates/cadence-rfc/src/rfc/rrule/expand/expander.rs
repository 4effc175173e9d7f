//! Query facade over the expansion loop.

use cadence_core::config::Settings;
use chrono::NaiveDateTime;

use super::iter::{ExpansionOptions, Termination, expand};
use crate::error::RfcResult;
use crate::rfc::rrule::collect::{CallbackIterResult, IterResult, QueryWindow, ResultCollector};
use crate::rfc::rrule::core::RecurrenceSpec;
use crate::rfc::rrule::timezone::TimeZoneResolver;

/// ## Summary
/// Runs queries against validated rules.
///
/// Holds the expansion options and a timezone resolver whose cache is
/// shared by every query made through the same expander.
#[derive(Debug)]
pub struct Expander {
    options: ExpansionOptions,
    resolver: TimeZoneResolver,
}

impl Expander {
    #[must_use]
    pub fn new(options: ExpansionOptions) -> Self {
        let resolver = if options.lenient_gaps {
            TimeZoneResolver::lenient()
        } else {
            TimeZoneResolver::new()
        };
        Self { options, resolver }
    }

    /// ## Summary
    /// Builds an expander from loaded settings.
    ///
    /// ## Errors
    /// Returns `RfcError::CoreError` if the settings fail validation.
    pub fn from_settings(settings: &Settings) -> RfcResult<Self> {
        Ok(Self::new(ExpansionOptions::try_from(settings)?))
    }

    #[must_use]
    pub fn options(&self) -> &ExpansionOptions {
        &self.options
    }

    /// Drives `spec` into a caller-owned collector.
    pub fn run<C>(&mut self, spec: &RecurrenceSpec, collector: &mut C) -> Termination
    where
        C: ResultCollector + ?Sized,
    {
        expand(spec, collector, &mut self.resolver, &self.options)
    }

    /// ## Summary
    /// Every occurrence of `spec`, capped at `max_instances`.
    #[must_use]
    pub fn all(&mut self, spec: &RecurrenceSpec) -> Vec<NaiveDateTime> {
        let cap = self.options.max_instances;
        self.all_with(spec, |_, kept| kept < cap)
    }

    /// ## Summary
    /// Occurrences of `spec` for as long as `callback` approves them.
    ///
    /// The callback receives each occurrence and the number already kept.
    /// The first refusal ends expansion.
    pub fn all_with<F>(&mut self, spec: &RecurrenceSpec, callback: F) -> Vec<NaiveDateTime>
    where
        F: FnMut(NaiveDateTime, usize) -> bool,
    {
        let mut collector = CallbackIterResult::new(QueryWindow::all(), callback);
        self.run(spec, &mut collector);
        collector.into_values()
    }

    /// Occurrences between `after` and `before`.
    #[must_use]
    pub fn between(
        &mut self,
        spec: &RecurrenceSpec,
        after: NaiveDateTime,
        before: NaiveDateTime,
        inclusive: bool,
    ) -> Vec<NaiveDateTime> {
        let mut collector = IterResult::between(after, before, inclusive);
        self.run(spec, &mut collector);
        collector.into_values()
    }

    /// The last occurrence before `date`.
    #[must_use]
    pub fn before(
        &mut self,
        spec: &RecurrenceSpec,
        date: NaiveDateTime,
        inclusive: bool,
    ) -> Option<NaiveDateTime> {
        let mut collector = IterResult::before(date, inclusive);
        self.run(spec, &mut collector);
        collector.into_last()
    }

    /// The first occurrence after `date`.
    #[must_use]
    pub fn after(
        &mut self,
        spec: &RecurrenceSpec,
        date: NaiveDateTime,
        inclusive: bool,
    ) -> Option<NaiveDateTime> {
        let mut collector = IterResult::after(date, inclusive);
        self.run(spec, &mut collector);
        collector.into_first()
    }
}

impl Default for Expander {
    fn default() -> Self {
        Self::new(ExpansionOptions::default())
    }
}
