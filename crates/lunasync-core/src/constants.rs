//! Fixed constants of the real-time to game-time mapping.
//!
//! In-game tick 0 is 06:00 local time, one in-game day is 24 000 ticks, and
//! the moon advances one phase per in-game day through an 8-phase cycle.
//! The lunar values anchor that cycle to the real sky.

/// Ticks in one in-game day.
pub const DAY_LENGTH_TICKS: u32 = 24_000;

/// Tick value of local midnight. Tick 0 is 06:00, so 00:00 sits 18 000
/// ticks into the in-game day.
pub const DAY_START_OFFSET_TICKS: u32 = 18_000;

/// Number of moon phases in one lunar cycle.
pub const MOON_PHASE_COUNT: u32 = 8;

/// Ticks in one full lunar cycle of in-game days (`24000 * 8`).
pub const FULL_CYCLE_TICKS: u32 = DAY_LENGTH_TICKS * MOON_PHASE_COUNT;

/// Real seconds in one day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Tick rate as the reduced fraction `24000 / 86400 = 5 / 18`.
pub const TICKS_PER_SECOND_NUMERATOR: u32 = 5;

/// Denominator of the tick rate fraction.
pub const TICKS_PER_SECOND_DENOMINATOR: u32 = 18;

/// Unix timestamp of the reference full moon, 2024-01-25T17:54:00Z.
pub const FULL_MOON_REFERENCE_TIMESTAMP: i64 = 1_706_205_240;

/// Length of one lunar cycle in seconds (29 days 12 hours).
pub const MOON_CYCLE_SECONDS: i64 = 2_548_800;

/// Length of one moon phase in seconds (an eighth of the cycle).
pub const MOON_PHASE_SECONDS: i64 = MOON_CYCLE_SECONDS / 8;

/// Upper bound accepted for a configured lunar cycle (100 years).
pub const MAX_CYCLE_SECONDS: u64 = 100 * 365 * 86_400;
