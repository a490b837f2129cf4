//! Sync command parsing and execution.
//!
//! A command has the shape `<time|datetime> <value|now> [world]`. With two
//! arguments the target is the sender's current world; senders without a
//! world (a console) must name one.

use chrono::{DateTime, FixedOffset, Utc};
use lunasync_types::{Action, WorldName};
use tracing::warn;

use crate::host::WorldHost;
use crate::service::{Applied, DateAndTimeService};
use crate::temporal::{Temporal, TemporalParseError, parse_temporal};

/// Usage line for the sync command.
pub const USAGE: &str = "<time|datetime> <value|now> [world]";

/// Errors surfaced to whoever issued a sync command.
///
/// None of these are retried; each one is reported and the command ends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The command had fewer than 2 or more than 3 arguments.
    #[error("expected 2 or 3 arguments, got {count}")]
    InvalidArgumentCount {
        /// How many arguments were given.
        count: usize,
    },

    /// The first argument is not a known action keyword.
    #[error("invalid action {keyword:?}, expected \"time\" or \"datetime\"")]
    InvalidAction {
        /// The rejected keyword.
        keyword: String,
    },

    /// The temporal argument could not be parsed.
    #[error(transparent)]
    InvalidTemporalFormat(#[from] TemporalParseError),

    /// The target world does not exist.
    #[error("invalid world: {world}")]
    InvalidWorld {
        /// The name that failed to resolve.
        world: WorldName,
    },

    /// Two arguments were given by a sender that is not in any world.
    #[error("only players can use this command with 2 arguments")]
    MissingWorld,
}

impl CommandError {
    /// Whether the sender should be shown the usage line.
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgumentCount { .. } | Self::InvalidAction { .. }
        )
    }
}

/// A fully parsed sync command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCommand {
    /// The world to set.
    pub world: WorldName,
    /// The value to set it to. Its variant carries the action.
    pub temporal: Temporal,
}

impl SyncCommand {
    /// Parse command arguments.
    ///
    /// `sender_world` is the world the sender is in, if any. Local temporal
    /// values are read in `offset`, and `now` resolves to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArgumentCount`],
    /// [`CommandError::InvalidAction`],
    /// [`CommandError::InvalidTemporalFormat`], or
    /// [`CommandError::MissingWorld`].
    pub fn parse<S: AsRef<str>>(
        args: &[S],
        sender_world: Option<&WorldName>,
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> Result<Self, CommandError> {
        let (keyword, value, world) = match args {
            [keyword, value] => (keyword.as_ref(), value.as_ref(), None),
            [keyword, value, world] => (keyword.as_ref(), value.as_ref(), Some(world.as_ref())),
            _ => return Err(CommandError::InvalidArgumentCount { count: args.len() }),
        };

        let world = match (world, sender_world) {
            (Some(name), _) => WorldName::from(name),
            (None, Some(current)) => current.clone(),
            (None, None) => return Err(CommandError::MissingWorld),
        };

        let action = Action::from_keyword(keyword).ok_or_else(|| CommandError::InvalidAction {
            keyword: keyword.to_owned(),
        })?;
        let temporal = parse_temporal(action, value, offset, now)?;

        Ok(Self { world, temporal })
    }

    /// The action this command performs.
    pub const fn action(&self) -> Action {
        self.temporal.action()
    }
}

/// Parse and run a sync command against `service`.
///
/// # Errors
///
/// Returns any [`CommandError`] from parsing or applying the command.
pub fn run_command<H: WorldHost, S: AsRef<str>>(
    service: &mut DateAndTimeService<H>,
    args: &[S],
    sender_world: Option<&WorldName>,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<Applied, CommandError> {
    let result = SyncCommand::parse(args, sender_world, offset, now)
        .and_then(|command| service.apply(&command.world, &command.temporal));
    if let Err(err) = &result {
        warn!(error = %err, argc = args.len(), "sync command rejected");
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use lunasync_types::ApplyKind;

    use super::*;
    use crate::convert::TimeConverter;
    use crate::host::InMemoryHost;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, 25)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn service() -> DateAndTimeService<InMemoryHost> {
        DateAndTimeService::new(
            TimeConverter::standard(),
            InMemoryHost::with_worlds(["world", "world_nether"]),
        )
    }

    #[test]
    fn argument_count_is_checked() {
        let world = WorldName::from("world");
        for args in [vec![], vec!["time"], vec!["time", "now", "world", "extra"]] {
            let err = SyncCommand::parse(&args, Some(&world), utc(), fixed_now()).unwrap_err();
            assert_eq!(err, CommandError::InvalidArgumentCount { count: args.len() });
            assert!(err.is_usage());
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let world = WorldName::from("world");
        let err = SyncCommand::parse(&["weather", "now"], Some(&world), utc(), fixed_now())
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidAction {
                keyword: "weather".to_owned()
            }
        );
        assert!(err.is_usage());
    }

    #[test]
    fn bad_temporal_is_rejected() {
        let world = WorldName::from("world");
        let err = SyncCommand::parse(&["time", "6pm"], Some(&world), utc(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidTemporalFormat(_)));
        assert!(!err.is_usage());
    }

    #[test]
    fn two_arguments_target_sender_world() {
        let world = WorldName::from("world_nether");
        let command =
            SyncCommand::parse(&["time", "12:00"], Some(&world), utc(), fixed_now()).unwrap();
        assert_eq!(command.world, world);
        assert_eq!(command.action(), Action::Time);
    }

    #[test]
    fn two_arguments_without_sender_world_fail() {
        let err = SyncCommand::parse(&["time", "12:00"], None, utc(), fixed_now()).unwrap_err();
        assert_eq!(err, CommandError::MissingWorld);
    }

    #[test]
    fn explicit_world_wins_over_sender_world() {
        let sender = WorldName::from("world");
        let command = SyncCommand::parse(
            &["datetime", "2024-01-25T06:00", "world_nether"],
            Some(&sender),
            utc(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(command.world, WorldName::from("world_nether"));
        assert_eq!(command.action(), Action::DateTime);
    }

    #[test]
    fn run_command_applies_date_time() {
        let mut service = service();
        let applied = run_command(
            &mut service,
            &["datetime", "2024-01-25T06:00:00", "world"],
            None,
            utc(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(applied.kind, ApplyKind::DateTimeSet);
        assert_eq!(applied.ticks, 0);
        assert_eq!(
            applied.message(),
            "Minecraft time is set to 0 for 2024-01-25T06:00:00"
        );
    }

    #[test]
    fn run_command_now_uses_given_clock() {
        let mut service = service();
        let sender = WorldName::from("world");
        let applied =
            run_command(&mut service, &["time", "now"], Some(&sender), utc(), fixed_now())
                .unwrap();
        assert_eq!(applied.kind, ApplyKind::TimeSet);
        assert_eq!(applied.ticks, 0);
    }

    #[test]
    fn run_command_reports_unknown_world() {
        let mut service = service();
        let err = run_command(
            &mut service,
            &["time", "08:00", "world_the_end"],
            None,
            utc(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidWorld {
                world: WorldName::from("world_the_end")
            }
        );
    }
}
