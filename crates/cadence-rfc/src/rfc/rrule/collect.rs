//! Result collectors fed by the expansion loop.
//!
//! A collector decides which occurrences to keep and when expansion stops.
//! [`IterResult`] implements the standard query modes; [`CallbackIterResult`]
//! adds a caller-supplied predicate that can end iteration early.

use chrono::NaiveDateTime;

/// Query mode of a collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethod {
    All,
    Between,
    Before,
    After,
}

/// Receives occurrences from the expansion loop.
pub trait ResultCollector {
    /// Offers one occurrence. Returning `false` stops expansion.
    fn accept(&mut self, occurrence: NaiveDateTime) -> bool;

    fn method(&self) -> QueryMethod;

    /// Earliest occurrence the collector keeps, if bounded below.
    fn min_date(&self) -> Option<NaiveDateTime> {
        None
    }

    /// Latest occurrence the collector keeps, if bounded above.
    fn max_date(&self) -> Option<NaiveDateTime> {
        None
    }
}

/// Query mode plus its bounds.
///
/// With `inclusive` unset an occurrence equal to a bound is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    method: QueryMethod,
    min_date: Option<NaiveDateTime>,
    max_date: Option<NaiveDateTime>,
    inclusive: bool,
}

enum Verdict {
    Skip,
    Keep,
    KeepAndStop,
    Stop,
}

impl QueryWindow {
    #[must_use]
    pub fn all() -> Self {
        Self {
            method: QueryMethod::All,
            min_date: None,
            max_date: None,
            inclusive: true,
        }
    }

    /// Occurrences between `after` and `before`.
    #[must_use]
    pub fn between(after: NaiveDateTime, before: NaiveDateTime, inclusive: bool) -> Self {
        Self {
            method: QueryMethod::Between,
            min_date: Some(after),
            max_date: Some(before),
            inclusive,
        }
    }

    /// The last occurrence before `date`.
    #[must_use]
    pub fn before(date: NaiveDateTime, inclusive: bool) -> Self {
        Self {
            method: QueryMethod::Before,
            min_date: None,
            max_date: Some(date),
            inclusive,
        }
    }

    /// The first occurrence after `date`.
    #[must_use]
    pub fn after(date: NaiveDateTime, inclusive: bool) -> Self {
        Self {
            method: QueryMethod::After,
            min_date: Some(date),
            max_date: None,
            inclusive,
        }
    }

    #[must_use]
    pub fn method(&self) -> QueryMethod {
        self.method
    }

    #[must_use]
    pub fn min_date(&self) -> Option<NaiveDateTime> {
        self.min_date
    }

    #[must_use]
    pub fn max_date(&self) -> Option<NaiveDateTime> {
        self.max_date
    }

    #[must_use]
    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    fn judge(&self, date: NaiveDateTime) -> Verdict {
        let too_early = self
            .min_date
            .is_some_and(|min| date < min || (!self.inclusive && date == min));
        let too_late = self
            .max_date
            .is_some_and(|max| date > max || (!self.inclusive && date == max));

        match self.method {
            QueryMethod::All => Verdict::Keep,
            QueryMethod::Between if too_early => Verdict::Skip,
            QueryMethod::Between | QueryMethod::Before if too_late => Verdict::Stop,
            QueryMethod::Between | QueryMethod::Before => Verdict::Keep,
            QueryMethod::After if too_early => Verdict::Skip,
            QueryMethod::After => Verdict::KeepAndStop,
        }
    }
}

/// Collects occurrences for one [`QueryWindow`].
#[derive(Debug, Clone)]
pub struct IterResult {
    window: QueryWindow,
    values: Vec<NaiveDateTime>,
    total: usize,
}

impl IterResult {
    #[must_use]
    pub fn new(window: QueryWindow) -> Self {
        Self {
            window,
            values: Vec::new(),
            total: 0,
        }
    }

    #[must_use]
    pub fn all() -> Self {
        Self::new(QueryWindow::all())
    }

    #[must_use]
    pub fn between(after: NaiveDateTime, before: NaiveDateTime, inclusive: bool) -> Self {
        Self::new(QueryWindow::between(after, before, inclusive))
    }

    #[must_use]
    pub fn before(date: NaiveDateTime, inclusive: bool) -> Self {
        Self::new(QueryWindow::before(date, inclusive))
    }

    #[must_use]
    pub fn after(date: NaiveDateTime, inclusive: bool) -> Self {
        Self::new(QueryWindow::after(date, inclusive))
    }

    /// Kept occurrences in emission order.
    #[must_use]
    pub fn values(&self) -> &[NaiveDateTime] {
        &self.values
    }

    /// Number of occurrences offered, kept or not.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn into_values(self) -> Vec<NaiveDateTime> {
        self.values
    }

    #[must_use]
    pub fn into_first(self) -> Option<NaiveDateTime> {
        self.values.first().copied()
    }

    #[must_use]
    pub fn into_last(self) -> Option<NaiveDateTime> {
        self.values.last().copied()
    }
}

impl ResultCollector for IterResult {
    fn accept(&mut self, occurrence: NaiveDateTime) -> bool {
        self.total += 1;
        match self.window.judge(occurrence) {
            Verdict::Skip => true,
            Verdict::Stop => false,
            Verdict::Keep => {
                self.values.push(occurrence);
                true
            }
            Verdict::KeepAndStop => {
                self.values.push(occurrence);
                false
            }
        }
    }

    fn method(&self) -> QueryMethod {
        self.window.method
    }

    fn min_date(&self) -> Option<NaiveDateTime> {
        self.window.min_date
    }

    fn max_date(&self) -> Option<NaiveDateTime> {
        self.window.max_date
    }
}

/// [`IterResult`] variant that consults a callback before keeping each
/// occurrence.
///
/// The callback receives the occurrence and the number already kept.
/// Returning `false` stops expansion without keeping the occurrence.
pub struct CallbackIterResult<F>
where
    F: FnMut(NaiveDateTime, usize) -> bool,
{
    inner: IterResult,
    callback: F,
}

impl<F> CallbackIterResult<F>
where
    F: FnMut(NaiveDateTime, usize) -> bool,
{
    #[must_use]
    pub fn new(window: QueryWindow, callback: F) -> Self {
        Self {
            inner: IterResult::new(window),
            callback,
        }
    }

    #[must_use]
    pub fn values(&self) -> &[NaiveDateTime] {
        self.inner.values()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.inner.total()
    }

    #[must_use]
    pub fn into_values(self) -> Vec<NaiveDateTime> {
        self.inner.into_values()
    }
}

impl<F> ResultCollector for CallbackIterResult<F>
where
    F: FnMut(NaiveDateTime, usize) -> bool,
{
    fn accept(&mut self, occurrence: NaiveDateTime) -> bool {
        self.inner.total += 1;
        let keep = |inner: &mut IterResult, callback: &mut F| {
            let approved = callback(occurrence, inner.values.len());
            if approved {
                inner.values.push(occurrence);
            }
            approved
        };

        match self.inner.window.judge(occurrence) {
            Verdict::Skip => true,
            Verdict::Stop => false,
            Verdict::Keep => keep(&mut self.inner, &mut self.callback),
            Verdict::KeepAndStop => {
                keep(&mut self.inner, &mut self.callback);
                false
            }
        }
    }

    fn method(&self) -> QueryMethod {
        self.inner.method()
    }

    fn min_date(&self) -> Option<NaiveDateTime> {
        self.inner.min_date()
    }

    fn max_date(&self) -> Option<NaiveDateTime> {
        self.inner.max_date()
    }
}

impl<F> std::fmt::Debug for CallbackIterResult<F>
where
    F: FnMut(NaiveDateTime, usize) -> bool,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackIterResult")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
