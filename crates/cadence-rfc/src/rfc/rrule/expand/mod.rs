//! RRULE expansion engine.
//!
//! Each cycle of a rule (one year, month, week, day, hour, minute or second
//! depending on the frequency) is turned into a set of candidate days from
//! precomputed calendar masks, filtered by the `BYxxx` constraints, combined
//! with the cycle's times of day and handed to a [`ResultCollector`] in
//! chronological order.
//!
//! [`ResultCollector`]: crate::rfc::rrule::collect::ResultCollector

mod counter;
mod cycle;
pub mod dateutil;
mod easter;
mod expander;
mod filter;
mod iter;
mod optimize;
mod poslist;
mod timeset;

pub use expander::Expander;
pub use iter::{ExpansionOptions, Termination, expand};
