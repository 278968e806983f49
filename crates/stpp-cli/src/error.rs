//! Errors reported by the command line tool.

use std::io;
use std::path::PathBuf;

use stpp::EngineError;
use thiserror::Error;

/// Exit status for a fatal error during the pass.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for invalid configuration or usage.
pub const EXIT_USAGE: u8 = 2;

/// Errors that stop the tool.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input file could not be opened.
    #[error("could not open input stream `{}`: {source}", path.display())]
    OpenInput {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// The output file could not be created.
    #[error("could not open output stream `{}`: {source}", path.display())]
    CreateOutput {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// The pass itself failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An I/O error occurred outside the pass.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}
