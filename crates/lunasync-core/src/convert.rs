//! Real-world time to game-time conversion.
//!
//! The converter maps a real offset date-time onto the game's full clock:
//! the local time of day picks the position within an in-game day, and the
//! position within the real lunar cycle picks which of the eight in-game
//! days (moon phases) that position lands on.
//!
//! # Design Principles
//!
//! - Conversions are pure. The same input always yields the same ticks and
//!   nothing is cached between calls.
//! - Lunar arithmetic runs on signed `i128` nanoseconds, so every date chrono
//!   can represent converts exactly and phase boundaries never round.
//! - The full-moon anchor is found in closed form with a Euclidean remainder
//!   instead of stepping whole cycles toward the input.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use lunasync_types::MoonPhase;
use serde::Serialize;
use tracing::debug;

use crate::constants::{
    DAY_LENGTH_TICKS, DAY_START_OFFSET_TICKS, FULL_CYCLE_TICKS, FULL_MOON_REFERENCE_TIMESTAMP,
    MAX_CYCLE_SECONDS, MOON_CYCLE_SECONDS, MOON_PHASE_COUNT, TICKS_PER_SECOND_DENOMINATOR,
    TICKS_PER_SECOND_NUMERATOR,
};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Errors that can occur when building a converter from explicit parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The lunar parameters cannot describe a usable cycle.
    #[error("invalid lunar configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// A time of day paired with the fixed UTC offset it was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    time: NaiveTime,
    offset: FixedOffset,
}

impl OffsetTime {
    /// Pair a local time with its offset.
    pub const fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    /// Take the local time of day of a date-time, keeping its offset.
    pub fn from_date_time(date_time: &DateTime<FixedOffset>) -> Self {
        Self {
            time: date_time.time(),
            offset: *date_time.offset(),
        }
    }

    /// Return the local time of day.
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// Return the UTC offset.
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Re-express the same moment in another offset. The wall-clock reading
    /// shifts by the offset difference and wraps around midnight.
    pub fn with_offset_same_instant(&self, offset: FixedOffset) -> Self {
        let shift = i64::from(offset.local_minus_utc())
            .saturating_sub(i64::from(self.offset.local_minus_utc()));
        let (time, _) = self
            .time
            .overflowing_add_signed(TimeDelta::seconds(shift));
        Self { time, offset }
    }
}

impl core::fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.time, self.offset)
    }
}

/// A full game-clock reading broken into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    /// Full ticks in `[0, 192000)`: `time_of_day + 24000 * phase`.
    pub full_ticks: u32,
    /// Time-of-day ticks in `[0, 24000)`.
    pub time_of_day: u32,
    /// Moon phase encoded by `full_ticks`.
    pub moon_phase: MoonPhase,
}

/// Maps real offset date-times onto game ticks.
///
/// The converter is a small `Copy` value holding the lunar anchor. Build one
/// with [`TimeConverter::standard`] for the real sky, or with
/// [`TimeConverter::new`] for a custom reference and cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConverter {
    /// A moment of full moon. Every `cycle` before and after it is one too.
    reference: DateTime<Utc>,

    /// Lunar cycle length in nanoseconds. Always positive, and always a
    /// multiple of 16 so that phases and half-phases divide it exactly.
    cycle_nanos: i128,
}

impl Default for TimeConverter {
    fn default() -> Self {
        Self::standard()
    }
}

impl TimeConverter {
    /// The converter for the real sky: full moon on 2024-01-25T17:54:00Z and
    /// a cycle of 29 days 12 hours.
    pub fn standard() -> Self {
        Self {
            reference: DateTime::from_timestamp(FULL_MOON_REFERENCE_TIMESTAMP, 0)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            cycle_nanos: i128::from(MOON_CYCLE_SECONDS).saturating_mul(NANOS_PER_SECOND),
        }
    }

    /// Create a converter from an explicit full-moon reference and cycle
    /// length in whole seconds.
    ///
    /// Whole seconds are always divisible into eight phases and sixteen
    /// half-phases at nanosecond resolution, so no precision is lost.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidConfig`] if `cycle_seconds` is zero or
    /// longer than a century.
    pub fn new<Tz: TimeZone>(
        reference: &DateTime<Tz>,
        cycle_seconds: u64,
    ) -> Result<Self, ConvertError> {
        if cycle_seconds == 0 {
            return Err(ConvertError::InvalidConfig {
                reason: "cycle_seconds must be at least 1".to_owned(),
            });
        }
        if cycle_seconds > MAX_CYCLE_SECONDS {
            return Err(ConvertError::InvalidConfig {
                reason: format!("cycle_seconds must not exceed {MAX_CYCLE_SECONDS}"),
            });
        }
        Ok(Self {
            reference: reference.with_timezone(&Utc),
            cycle_nanos: i128::from(cycle_seconds).saturating_mul(NANOS_PER_SECOND),
        })
    }

    /// Return the full-moon reference instant.
    pub const fn full_moon_reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Return the lunar cycle length.
    pub fn cycle(&self) -> TimeDelta {
        delta_from_nanos(self.cycle_nanos)
    }

    /// Return the length of one moon phase (an eighth of the cycle).
    pub fn phase_duration(&self) -> TimeDelta {
        delta_from_nanos(self.phase_nanos())
    }

    /// Convert an offset date-time to full ticks in `[0, 192000)`.
    ///
    /// The local time of day gives the position within the in-game day and
    /// the moon phase adds `24000` ticks per phase.
    pub fn convert_date_time(&self, date_time: &DateTime<FixedOffset>) -> u32 {
        let reading = self.read(date_time);
        debug!(
            input = %date_time,
            ticks = reading.full_ticks,
            time_of_day = reading.time_of_day,
            phase = reading.moon_phase.index(),
            "converted date-time"
        );
        reading.full_ticks
    }

    /// Convert an offset time of day to ticks in `[0, 24000)`.
    ///
    /// Only the local wall-clock reading matters; the offset says how that
    /// reading was taken and does not shift it.
    pub fn convert_time(&self, time: &OffsetTime) -> u32 {
        let ticks = time_of_day_ticks(time.time());
        debug!(input = %time, ticks, offset = %time.offset(), "converted time of day");
        ticks
    }

    /// Break an offset date-time into its full game-clock reading.
    pub fn read(&self, date_time: &DateTime<FixedOffset>) -> ClockReading {
        let time_of_day = time_of_day_ticks(date_time.time());
        let moon_phase = self.moon_phase(date_time);
        let full_ticks = DAY_LENGTH_TICKS
            .saturating_mul(moon_phase.index())
            .saturating_add(time_of_day);
        ClockReading {
            full_ticks,
            time_of_day,
            moon_phase,
        }
    }

    /// Compute the moon phase at the given instant.
    ///
    /// Phase boundaries sit halfway between phase markers, so the full moon
    /// covers half a phase on either side of each full-moon instant.
    pub fn moon_phase<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> MoonPhase {
        let phase = self.phase_nanos();
        let until_full_moon = self.until_full_moon_nanos(instant);
        let until_next_cycle = self.cycle_nanos.saturating_sub(until_full_moon);
        let adjusted = until_next_cycle.saturating_add(phase.checked_div(2).unwrap_or(0));

        // adjusted is in [phase / 2, cycle + phase / 2], never negative.
        let count = adjusted.checked_div(phase).unwrap_or(0);
        let index = count.checked_rem(i128::from(MOON_PHASE_COUNT)).unwrap_or(0);
        MoonPhase::from_index(u32::try_from(index).unwrap_or(0))
    }

    /// Return how long until the next full moon, in `[0, cycle)`. Zero means
    /// the instant is itself a full moon.
    pub fn time_until_full_moon<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> TimeDelta {
        delta_from_nanos(self.until_full_moon_nanos(instant))
    }

    /// Return the first full moon at or after the given instant, expressed
    /// in the same offset as the input.
    pub fn next_full_moon(&self, date_time: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let until = self.time_until_full_moon(date_time);
        date_time
            .checked_add_signed(until)
            .unwrap_or(*date_time)
    }

    fn phase_nanos(&self) -> i128 {
        self.cycle_nanos
            .checked_div(i128::from(MOON_PHASE_COUNT))
            .unwrap_or(0)
    }

    /// `(reference - instant) mod cycle`, normalized into `[0, cycle)`.
    fn until_full_moon_nanos<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> i128 {
        let delta = instant_nanos(&self.reference).saturating_sub(instant_nanos(instant));
        delta.checked_rem_euclid(self.cycle_nanos).unwrap_or(0)
    }
}

/// Map a local wall-clock time to time-of-day ticks in `[0, 24000)`.
///
/// Seconds since midnight are scaled by `5/18`, shifted so that 06:00 is
/// tick 0, and truncated. Sub-second precision is dropped before scaling,
/// so 05:59:59.999999999 is tick 23999, not 0.
pub fn time_of_day_ticks(time: NaiveTime) -> u32 {
    let second_of_day = time.num_seconds_from_midnight();
    let scaled = second_of_day
        .saturating_mul(TICKS_PER_SECOND_NUMERATOR)
        .checked_div(TICKS_PER_SECOND_DENOMINATOR)
        .unwrap_or(0);
    scaled
        .saturating_add(DAY_START_OFFSET_TICKS)
        .checked_rem(DAY_LENGTH_TICKS)
        .unwrap_or(0)
}

/// Read the moon phase a host derives from a raw full-time tick count.
///
/// Hosts track moon phase as `(ticks mod 192000) / 24000`; converted full
/// ticks always agree with this mapping.
pub fn moon_phase_of_ticks(ticks: u64) -> MoonPhase {
    let within_cycle = ticks.checked_rem(u64::from(FULL_CYCLE_TICKS)).unwrap_or(0);
    let day = within_cycle
        .checked_div(u64::from(DAY_LENGTH_TICKS))
        .unwrap_or(0);
    MoonPhase::from_index(u32::try_from(day).unwrap_or(0))
}

/// Read the time-of-day ticks a host derives from a raw full-time tick count.
pub fn time_of_day_of_ticks(ticks: u64) -> u32 {
    let within_day = ticks.checked_rem(u64::from(DAY_LENGTH_TICKS)).unwrap_or(0);
    u32::try_from(within_day).unwrap_or(0)
}

fn instant_nanos<Tz: TimeZone>(instant: &DateTime<Tz>) -> i128 {
    i128::from(instant.timestamp())
        .saturating_mul(NANOS_PER_SECOND)
        .saturating_add(i128::from(instant.timestamp_subsec_nanos()))
}

/// Convert nanoseconds known to be within a century back into a [`TimeDelta`].
fn delta_from_nanos(nanos: i128) -> TimeDelta {
    let seconds = nanos.checked_div(NANOS_PER_SECOND).unwrap_or(0);
    let subsec = nanos.checked_rem(NANOS_PER_SECOND).unwrap_or(0);
    TimeDelta::seconds(i64::try_from(seconds).unwrap_or(0))
        .checked_add(&TimeDelta::nanoseconds(i64::try_from(subsec).unwrap_or(0)))
        .unwrap_or_default()
}
