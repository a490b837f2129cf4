//! Date-and-time service: converts a parsed temporal value and applies it to
//! a world through the [`WorldHost`] capability.

use lunasync_types::{ApplyKind, MoonPhase, WorldName};
use serde::Serialize;
use tracing::info;

use crate::command::CommandError;
use crate::convert::{TimeConverter, moon_phase_of_ticks};
use crate::host::{HostError, WorldHost};
use crate::temporal::Temporal;

/// The result of a successful apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applied {
    /// Which clock flavor was set.
    pub kind: ApplyKind,
    /// The world whose clock was set.
    pub world: WorldName,
    /// Ticks handed to the host.
    pub ticks: u32,
    /// Moon phase encoded by `ticks`, for date-time applies only.
    pub moon_phase: Option<MoonPhase>,
    /// The applied real-world value, truncated to whole seconds.
    pub value: String,
}

impl Applied {
    /// The confirmation shown to whoever issued the command.
    pub fn message(&self) -> String {
        format!("Minecraft time is set to {} for {}", self.ticks, self.value)
    }
}

/// Applies converted real-world times to host worlds.
#[derive(Debug, Clone)]
pub struct DateAndTimeService<H> {
    converter: TimeConverter,
    host: H,
}

impl<H: WorldHost> DateAndTimeService<H> {
    /// Create a service that converts with `converter` and writes to `host`.
    pub const fn new(converter: TimeConverter, host: H) -> Self {
        Self { converter, host }
    }

    /// Convert `temporal` and set it on `world`.
    ///
    /// A time of day sets only the time of day; a date-time sets the full
    /// clock, moon phase included.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidWorld`] if the host has no such world.
    pub fn apply(
        &mut self,
        world: &WorldName,
        temporal: &Temporal,
    ) -> Result<Applied, CommandError> {
        let (kind, ticks, moon_phase, result) = match temporal {
            Temporal::Time(time) => {
                let ticks = self.converter.convert_time(time);
                let result = self.host.set_time_of_day(world, ticks);
                (ApplyKind::TimeSet, ticks, None, result)
            }
            Temporal::DateTime(date_time) => {
                let ticks = self.converter.convert_date_time(date_time);
                let result = self.host.set_full_time(world, ticks);
                let phase = moon_phase_of_ticks(u64::from(ticks));
                (ApplyKind::DateTimeSet, ticks, Some(phase), result)
            }
        };

        result.map_err(|err| match err {
            HostError::WorldNotFound { world } => CommandError::InvalidWorld { world },
        })?;

        info!(world = %world, ticks, kind = ?kind, value = %temporal, "clock applied");
        Ok(Applied {
            kind,
            world: world.clone(),
            ticks,
            moon_phase,
            value: temporal.to_string(),
        })
    }

    /// Return the converter in use.
    pub const fn converter(&self) -> &TimeConverter {
        &self.converter
    }

    /// Borrow the host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Consume the service and return the host.
    pub fn into_host(self) -> H {
        self.host
    }
}
