//! Parsing of the temporal argument of a sync command.
//!
//! A command value is either the literal `now` or an ISO-8601 local value:
//! `HH:MM[:SS[.fraction]]` for [`Action::Time`], or
//! `YYYY-MM-DDTHH:MM[:SS[.fraction]]` for [`Action::DateTime`]. Local values
//! carry no offset of their own and are read in a configured reference
//! offset.

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Utc};
use lunasync_types::Action;

use crate::convert::OffsetTime;

/// Token that resolves to the current moment.
pub const NOW_TOKEN: &str = "now";

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// Fixed-width layouts checked ahead of chrono, whose numeric specifiers also
// accept single digits, padding, signed years and leap seconds.
// `D` is any digit, `S` a digit 0-5.
const DATE_SHAPE: &str = "DDDD-DD-DDT";
const MINUTE_SHAPE: &str = "DD:DD";
const SECOND_SHAPE: &str = "DD:DD:SD";
const MAX_FRACTION_DIGITS: usize = 9;

/// A parsed temporal argument, already pinned to an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// A time of day; applying it leaves the moon phase alone.
    Time(OffsetTime),
    /// A full date-time; applying it sets the moon phase as well.
    DateTime(DateTime<FixedOffset>),
}

impl Temporal {
    /// The action this value was parsed for.
    pub const fn action(&self) -> Action {
        match self {
            Self::Time(_) => Action::Time,
            Self::DateTime(_) => Action::DateTime,
        }
    }
}

impl core::fmt::Display for Temporal {
    /// Render the local reading truncated to whole seconds, without offset.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Time(time) => write!(f, "{}", time.time().format("%H:%M:%S")),
            Self::DateTime(date_time) => write!(f, "{}", date_time.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// The temporal argument could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {action} format: {value:?}")]
pub struct TemporalParseError {
    /// The action the value was parsed for.
    pub action: Action,
    /// The rejected input.
    pub value: String,
}

/// Parse a command value for `action`.
///
/// `now` resolves to `now` re-expressed in `offset`. Any other value is read
/// as a local ISO-8601 time or date-time in `offset`.
///
/// # Errors
///
/// Returns [`TemporalParseError`] if the value matches none of the accepted
/// formats for `action`.
pub fn parse_temporal(
    action: Action,
    value: &str,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<Temporal, TemporalParseError> {
    if value == NOW_TOKEN {
        let local_now = now.with_timezone(&offset);
        return Ok(match action {
            Action::Time => Temporal::Time(OffsetTime::from_date_time(&local_now)),
            Action::DateTime => Temporal::DateTime(local_now),
        });
    }

    let parsed = match action {
        Action::Time => {
            parse_local_time(value).map(|time| Temporal::Time(OffsetTime::new(time, offset)))
        }
        Action::DateTime => parse_local_date_time(value)
            .and_then(|local| offset.from_local_datetime(&local).single())
            .map(Temporal::DateTime),
    };

    parsed.ok_or_else(|| TemporalParseError {
        action,
        value: value.to_owned(),
    })
}

/// Parse `HH:MM[:SS[.fraction]]`, with at most 9 fraction digits.
pub fn parse_local_time(value: &str) -> Option<NaiveTime> {
    if !has_time_shape(value) {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

/// Parse `YYYY-MM-DDTHH:MM[:SS[.fraction]]`, with at most 9 fraction digits.
pub fn parse_local_date_time(value: &str) -> Option<NaiveDateTime> {
    if !has_date_time_shape(value) {
        return None;
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn has_time_shape(value: &str) -> bool {
    match value.split_once('.') {
        None => matches_shape(value, MINUTE_SHAPE) || matches_shape(value, SECOND_SHAPE),
        Some((whole, fraction)) => {
            matches_shape(whole, SECOND_SHAPE)
                && (1..=MAX_FRACTION_DIGITS).contains(&fraction.len())
                && fraction.bytes().all(|byte| byte.is_ascii_digit())
        }
    }
}

fn has_date_time_shape(value: &str) -> bool {
    match (value.get(..DATE_SHAPE.len()), value.get(DATE_SHAPE.len()..)) {
        (Some(date), Some(time)) => matches_shape(date, DATE_SHAPE) && has_time_shape(time),
        _ => false,
    }
}

fn matches_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value
            .bytes()
            .zip(shape.bytes())
            .all(|(byte, expected)| match expected {
                b'D' => byte.is_ascii_digit(),
                b'S' => (b'0'..=b'5').contains(&byte),
                _ => byte == expected,
            })
}
