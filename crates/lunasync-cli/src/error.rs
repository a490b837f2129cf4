//! Error types for the lunasync binary.
//!
//! [`CliError`] is the top-level error type that wraps all possible failure
//! modes of a single invocation.

/// Top-level error for the lunasync binary.
///
/// Each variant wraps a specific subsystem error, providing a single error
/// type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lunasync_core::config::ConfigError,
    },

    /// The sync command was rejected.
    #[error("{source}")]
    Command {
        /// The underlying command error.
        #[from]
        source: lunasync_core::command::CommandError,
    },

    /// Rendering the result as JSON failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Process exit status for this error: 2 for usage errors, 1 otherwise.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Command { source } if source.is_usage() => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use lunasync_core::command::CommandError;

    use super::*;

    #[test]
    fn usage_errors_exit_with_two() {
        let err = CliError::from(CommandError::InvalidArgumentCount { count: 1 });
        assert_eq!(err.exit_code(), 2);
        let err = CliError::from(CommandError::InvalidAction {
            keyword: "weather".to_owned(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = CliError::from(CommandError::MissingWorld);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "only players can use this command with 2 arguments"
        );
    }
}
