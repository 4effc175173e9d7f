//! Recurrence rule model: frequencies, weekdays, constraint lists and the
//! validated spec handed to the expansion engine.

mod frequency;
pub(crate) mod resolve;
mod rule;

pub use frequency::{Frequency, Weekday, WeekdayNum};
pub use rule::{ByRules, RecurrenceRule, RecurrenceSpec};
