//! RFC 5545 recurrence rules.
//!
//! Rules are built with [`RecurrenceRule`], checked into an immutable
//! [`RecurrenceSpec`] and expanded through an [`Expander`] or directly with
//! [`expand`] and a [`ResultCollector`].

pub mod collect;
pub mod core;
pub mod expand;
pub mod set;
pub mod timezone;

pub use collect::{CallbackIterResult, IterResult, QueryMethod, QueryWindow, ResultCollector};
pub use self::core::{ByRules, Frequency, RecurrenceRule, RecurrenceSpec, Weekday, WeekdayNum};
pub use expand::{Expander, ExpansionOptions, Termination, expand};
pub use set::RecurrenceSet;
pub use timezone::{Rezone, TimeZoneResolver};
