//! Fatal errors that abort a pass.
//!
//! Output written before the error stays in the sink; nothing is retracted.

use std::io;

use thiserror::Error;

use crate::directive::DirectiveKind;

/// Errors that stop the pass immediately, whatever the nesting depth.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `define` or `undef` without a tag name.
    #[error("line {line}: `{directive}` statement without tag")]
    MissingTagName {
        /// The offending directive.
        directive: DirectiveKind,
        /// One-based line number.
        line: usize,
    },
    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tag_names_the_directive() {
        let err = EngineError::MissingTagName {
            directive: DirectiveKind::Undef,
            line: 3,
        };
        assert_eq!(err.to_string(), "line 3: `undef` statement without tag");
    }

    #[test]
    fn io_error_converts_from_std_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err: EngineError = io_err.into();
        assert!(err.to_string().contains("pipe closed"));
    }
}
