use thiserror::Error;

use crate::types::Command;

/// Errors that can occur when talking to a Neato robot.
#[derive(Debug, Error)]
pub enum NeatoError {
    /// The robot answered a command with `Unknown Cmd`.
    ///
    /// Usually means the firmware does not speak the expected test-mode dialect.
    #[error("{} failed: robot replied \"Unknown Cmd\"", .0.name())]
    CommandRejected(Command),

    /// The response to a command never contained its header line.
    #[error("{} response has no \"{header}\" header line", .command.name())]
    HeaderNotFound {
        command: Command,
        header: &'static str,
    },

    /// A telemetry field was read before any response populated it.
    #[error("Field not yet populated: {0}")]
    FieldNotPopulated(String),

    /// The control connection was lost or never established.
    #[error("Disconnected: {0}")]
    Disconnected(String),

    /// Connection establishment was aborted by the caller.
    #[error("Connection attempt cancelled")]
    ConnectCancelled,

    /// Connection establishment gave up after the configured number of attempts.
    #[error("Could not connect after {attempts} attempts")]
    ConnectExhausted { attempts: u32 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid driver configuration.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NeatoError>;
