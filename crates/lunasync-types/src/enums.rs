//! Enumeration types for lunasync.
//!
//! Moon phases follow the order used by the game engine: index 0 is the full
//! moon and each following index is one in-game day later.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Moon Phases
// ---------------------------------------------------------------------------

/// One of the eight discrete moon phases of the in-game lunar cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    /// Phase 0. Spans the half-phase window on both sides of a full moon.
    FullMoon,
    /// Phase 1.
    WaningGibbous,
    /// Phase 2.
    LastQuarter,
    /// Phase 3.
    WaningCrescent,
    /// Phase 4.
    NewMoon,
    /// Phase 5.
    WaxingCrescent,
    /// Phase 6.
    FirstQuarter,
    /// Phase 7.
    WaxingGibbous,
}

impl MoonPhase {
    /// Number of phases in one lunar cycle.
    pub const COUNT: u32 = 8;

    /// All phases in cycle order, starting at the full moon.
    pub const ALL: [Self; 8] = [
        Self::FullMoon,
        Self::WaningGibbous,
        Self::LastQuarter,
        Self::WaningCrescent,
        Self::NewMoon,
        Self::WaxingCrescent,
        Self::FirstQuarter,
        Self::WaxingGibbous,
    ];

    /// Map a phase index onto the cycle. Indices wrap, so `8` is the full
    /// moon again and `9` is waning gibbous.
    pub const fn from_index(index: u32) -> Self {
        match index % Self::COUNT {
            0 => Self::FullMoon,
            1 => Self::WaningGibbous,
            2 => Self::LastQuarter,
            3 => Self::WaningCrescent,
            4 => Self::NewMoon,
            5 => Self::WaxingCrescent,
            6 => Self::FirstQuarter,
            // 7 is the only remaining case after reducing modulo 8.
            _ => Self::WaxingGibbous,
        }
    }

    /// Return the zero-based phase index (0 = full moon).
    pub const fn index(self) -> u32 {
        match self {
            Self::FullMoon => 0,
            Self::WaningGibbous => 1,
            Self::LastQuarter => 2,
            Self::WaningCrescent => 3,
            Self::NewMoon => 4,
            Self::WaxingCrescent => 5,
            Self::FirstQuarter => 6,
            Self::WaxingGibbous => 7,
        }
    }

    /// Return the phase that follows this one.
    pub const fn next(self) -> Self {
        Self::from_index(self.index().saturating_add(1))
    }

    /// Human-readable phase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FullMoon => "full moon",
            Self::WaningGibbous => "waning gibbous",
            Self::LastQuarter => "last quarter",
            Self::WaningCrescent => "waning crescent",
            Self::NewMoon => "new moon",
            Self::WaxingCrescent => "waxing crescent",
            Self::FirstQuarter => "first quarter",
            Self::WaxingGibbous => "waxing gibbous",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Command Actions
// ---------------------------------------------------------------------------

/// What a sync command asks to set on a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Set only the time of day; the moon phase is left untouched.
    Time,
    /// Set the full clock, including the moon phase.
    DateTime,
}

impl Action {
    /// Resolve a command keyword. Keywords are case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "time" => Some(Self::Time),
            "datetime" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// The keyword that selects this action.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ---------------------------------------------------------------------------
// Apply Outcomes
// ---------------------------------------------------------------------------

/// Which flavor of clock update was applied to a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyKind {
    /// Time-of-day ticks in `[0, 24000)` were applied.
    TimeSet,
    /// Full ticks in `[0, 192000)` (time of day plus moon phase) were applied.
    DateTimeSet,
}

impl From<Action> for ApplyKind {
    fn from(action: Action) -> Self {
        match action {
            Action::Time => Self::TimeSet,
            Action::DateTime => Self::DateTimeSet,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn phase_index_round_trips_for_every_phase() {
        for (i, phase) in MoonPhase::ALL.iter().enumerate() {
            let index = u32::try_from(i).unwrap();
            assert_eq!(phase.index(), index);
            assert_eq!(MoonPhase::from_index(index), *phase);
        }
    }

    #[test]
    fn phase_index_wraps() {
        assert_eq!(MoonPhase::from_index(8), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_index(15), MoonPhase::WaxingGibbous);
        assert_eq!(MoonPhase::WaxingGibbous.next(), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::FullMoon.next(), MoonPhase::WaningGibbous);
    }

    #[test]
    fn action_keywords() {
        assert_eq!(Action::from_keyword("time"), Some(Action::Time));
        assert_eq!(Action::from_keyword("datetime"), Some(Action::DateTime));
        assert_eq!(Action::from_keyword("Time"), None);
        assert_eq!(Action::from_keyword("date"), None);
        assert_eq!(Action::DateTime.keyword(), "datetime");
    }

    #[test]
    fn apply_kind_follows_action() {
        assert_eq!(ApplyKind::from(Action::Time), ApplyKind::TimeSet);
        assert_eq!(ApplyKind::from(Action::DateTime), ApplyKind::DateTimeSet);
    }

    #[test]
    fn moon_phase_serializes_snake_case() {
        let json = serde_json::to_string(&MoonPhase::WaningGibbous).unwrap();
        assert_eq!(json, "\"waning_gibbous\"");
    }
}
