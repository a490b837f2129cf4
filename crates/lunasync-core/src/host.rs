//! Host capability trait and an in-memory implementation.
//!
//! The game server owns the worlds whose clocks get set. The [`WorldHost`]
//! trait abstracts that server so the service layer can be driven by a real
//! plugin binding, a console tool, or a test double.
//!
//! [`InMemoryHost`] keeps a registry of named worlds and their last applied
//! clock. It backs the CLI and the tests.

use std::collections::BTreeMap;

use lunasync_types::{MoonPhase, WorldName};
use tracing::info;

use crate::constants::DAY_LENGTH_TICKS;
use crate::convert::{moon_phase_of_ticks, time_of_day_of_ticks};

/// Errors a host can report when asked to set a world clock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// No world with this name is loaded.
    #[error("world not found: {world}")]
    WorldNotFound {
        /// The name that failed to resolve.
        world: WorldName,
    },
}

/// A game server whose world clocks can be set.
pub trait WorldHost {
    /// Set the time of day of `world`, keeping its current day (and so its
    /// moon phase). `ticks` is in `[0, 24000)`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::WorldNotFound`] if the world does not exist.
    fn set_time_of_day(&mut self, world: &WorldName, ticks: u32) -> Result<(), HostError>;

    /// Set the full clock of `world`. `ticks` is in `[0, 192000)` and encodes
    /// the moon phase as `ticks / 24000`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::WorldNotFound`] if the world does not exist.
    fn set_full_time(&mut self, world: &WorldName, ticks: u32) -> Result<(), HostError>;
}

/// Clock state of one world held by [`InMemoryHost`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldClockState {
    /// Raw full-time tick counter, as a game server stores it.
    pub full_time: u64,
}

impl WorldClockState {
    /// Time-of-day ticks derived from the counter.
    pub fn time_of_day(&self) -> u32 {
        time_of_day_of_ticks(self.full_time)
    }

    /// Moon phase derived from the counter.
    pub fn moon_phase(&self) -> MoonPhase {
        moon_phase_of_ticks(self.full_time)
    }
}

/// A host backed by a map of world names to clock states.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    worlds: BTreeMap<WorldName, WorldClockState>,
}

impl InMemoryHost {
    /// Create a host with no worlds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host with the given worlds, all at tick 0.
    pub fn with_worlds<I, W>(names: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<WorldName>,
    {
        let worlds = names
            .into_iter()
            .map(|name| (name.into(), WorldClockState::default()))
            .collect();
        Self { worlds }
    }

    /// Register a world at tick 0. Re-registering resets its clock.
    pub fn add_world(&mut self, world: impl Into<WorldName>) {
        self.worlds.insert(world.into(), WorldClockState::default());
    }

    /// Return the clock of `world`, if it exists.
    pub fn world(&self, world: &WorldName) -> Option<&WorldClockState> {
        self.worlds.get(world)
    }

    /// Return the number of registered worlds.
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    fn state_mut(&mut self, world: &WorldName) -> Result<&mut WorldClockState, HostError> {
        self.worlds
            .get_mut(world)
            .ok_or_else(|| HostError::WorldNotFound {
                world: world.clone(),
            })
    }
}

impl WorldHost for InMemoryHost {
    fn set_time_of_day(&mut self, world: &WorldName, ticks: u32) -> Result<(), HostError> {
        let state = self.state_mut(world)?;
        let day_length = u64::from(DAY_LENGTH_TICKS);
        let day_start = state
            .full_time
            .checked_div(day_length)
            .unwrap_or(0)
            .saturating_mul(day_length);
        state.full_time = day_start.saturating_add(u64::from(ticks));
        info!(world = %world, ticks, full_time = state.full_time, "world time of day set");
        Ok(())
    }

    fn set_full_time(&mut self, world: &WorldName, ticks: u32) -> Result<(), HostError> {
        let state = self.state_mut(world)?;
        state.full_time = u64::from(ticks);
        info!(
            world = %world,
            ticks,
            moon_phase = %state.moon_phase(),
            "world full time set"
        );
        Ok(())
    }
}
