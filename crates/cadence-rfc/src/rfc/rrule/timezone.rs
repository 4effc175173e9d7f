//! Timezone resolution and re-zoning of generated occurrences.
//!
//! The engine works on wall-clock [`NaiveDateTime`] values. When a rule
//! carries a TZID, every accepted candidate is interpreted as wall-clock time
//! in that zone and handed to the collector as the UTC wall-clock instant.
//! Windows zone names and IANA aliases are mapped through ICU4X.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

const SECONDS_PER_DAY: i64 = 86_400;

/// Why a wall-clock time could not be placed in a zone.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// The wall-clock time is skipped by a forward DST transition.
    #[error("{0} falls in a DST gap")]
    NonExistentTime(String),
}

/// Re-zones wall-clock candidates before they reach a collector.
pub trait Rezone {
    /// Maps a wall-clock time in `tzid` to the instant the collector sees.
    fn rezone(&mut self, local: NaiveDateTime, tzid: &str) -> NaiveDateTime;
}

/// ## Summary
/// Looks up `tzid` in the IANA database after stripping vendor prefixes and
/// mapping Windows names and retired aliases to canonical IANA names.
///
/// ## Errors
/// Returns `ConversionError::UnknownTimezone` for identifiers with no IANA
/// match.
pub fn resolve_tzid(tzid: &str) -> Result<Tz, ConversionError> {
    Tz::from_str(&normalize_tzid(tzid))
        .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))
}

/// Caching [`Rezone`] implementation backed by `chrono-tz`.
///
/// Zones are cached under the TZID exactly as the rule spells it.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    cache: HashMap<String, Tz>,
    lenient_gaps: bool,
}

impl TimeZoneResolver {
    /// Creates a resolver that warns about every DST-gap time it moves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver that moves DST-gap times without warning.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            cache: HashMap::new(),
            lenient_gaps: true,
        }
    }

    /// ## Summary
    /// Cached [`resolve_tzid`].
    ///
    /// ## Errors
    /// Returns `ConversionError::UnknownTimezone` for identifiers with no
    /// IANA match. Failures are not cached.
    pub fn resolve(&mut self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(&tz) = self.cache.get(tzid) {
            return Ok(tz);
        }
        let tz = resolve_tzid(tzid)?;
        Ok(*self.cache.entry(tzid.to_owned()).or_insert(tz))
    }

    /// ## Summary
    /// Places `local_time` in `tzid` and returns the instant in UTC.
    ///
    /// A time repeated by a DST fold maps to its earlier instant.
    ///
    /// ## Errors
    /// Fails for unknown zones and for times skipped by a DST gap.
    pub fn convert_to_utc(
        &mut self,
        local_time: NaiveDateTime,
        tzid: &str,
    ) -> Result<DateTime<Utc>, ConversionError> {
        let tz = self.resolve(tzid)?;

        match tz.from_local_datetime(&local_time) {
            LocalResult::None => Err(ConversionError::NonExistentTime(format!(
                "{local_time} in timezone {tzid}"
            ))),
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earlier, _later) => Ok(earlier.with_timezone(&Utc)),
        }
    }

    /// ## Summary
    /// [`TimeZoneResolver::convert_to_utc`] that maps a time skipped by a
    /// DST gap to the instant the gap ends.
    ///
    /// Every time inside one gap lands on the same instant, which is also
    /// where the first wall-clock time after the gap lands. Occurrences that
    /// were ordered in local time therefore stay ordered in UTC.
    ///
    /// ## Errors
    /// Fails for unknown zones.
    pub fn convert_to_utc_lenient(
        &mut self,
        local_time: NaiveDateTime,
        tzid: &str,
    ) -> Result<DateTime<Utc>, ConversionError> {
        match self.convert_to_utc(local_time, tzid) {
            Err(ConversionError::NonExistentTime(detail)) => {
                let tz = self.resolve(tzid)?;
                gap_end(tz, local_time).ok_or(ConversionError::NonExistentTime(detail))
            }
            other => other,
        }
    }
}

/// First instant whose wall-clock time in `tz` is not before `local`.
///
/// Offsets stay within a day of UTC, so the search window always brackets
/// the transition.
fn gap_end(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let anchor = local.and_utc().timestamp();
    let mut low = anchor.checked_sub(SECONDS_PER_DAY)?;
    let mut high = anchor.checked_add(SECONDS_PER_DAY)?;

    while high - low > 1 {
        let mid = low + (high - low) / 2;
        let wall = DateTime::from_timestamp(mid, 0)?
            .with_timezone(&tz)
            .naive_local();
        if wall < local {
            low = mid;
        } else {
            high = mid;
        }
    }
    DateTime::from_timestamp(high, 0)
}

impl Rezone for TimeZoneResolver {
    fn rezone(&mut self, local: NaiveDateTime, tzid: &str) -> NaiveDateTime {
        let converted = match self.convert_to_utc(local, tzid) {
            Err(ConversionError::NonExistentTime(_)) => {
                if !self.lenient_gaps {
                    tracing::warn!(%local, tzid, "Moving DST-gap time to the end of the gap");
                }
                self.convert_to_utc_lenient(local, tzid)
            }
            other => other,
        };

        match converted {
            Ok(utc) => utc.naive_utc(),
            // Validated rules only carry zones that resolve
            Err(err) => {
                tracing::error!(%local, tzid, error = %err, "Timezone conversion failed");
                local
            }
        }
    }
}

/// Strips calendar-vendor prefixes, then maps Windows zone names and IANA
/// aliases to canonical IANA names. Unrecognized names pass through.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let iana = IanaParserExtended::new();

    // Outlook and Exchange write Windows names such as "W. Europe Standard Time"
    let windows_zone = WindowsParser::new().parse(stripped, None);
    if let Some(entry) =
        windows_zone.and_then(|zone| iana.iter().find(|entry| entry.time_zone == zone))
    {
        return entry.canonical.to_string();
    }

    let parsed = iana.parse(stripped);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        stripped.to_string()
    } else {
        parsed.canonical.to_string()
    }
}
