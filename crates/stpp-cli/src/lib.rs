//! Command line front end for the `stpp` conditional text preprocessor.
//!
//! The binary reads one input stream, runs a single preprocessing pass and
//! writes the result to one output stream. Diagnostics and fatal errors are
//! logged to stderr so they never mix with the output.
//!
//! # Configuration
//!
//! - `STPP_LOG_LEVEL`: log verbosity (trace, debug, info, warn, error)
//! - `STPP_MARKER`: the character that introduces a directive
//!
//! Command line flags take precedence over both variables.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod run;
