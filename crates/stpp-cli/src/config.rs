//! Tool configuration parsed from environment variables.
//!
//! Settings can be overridden via environment variables prefixed with
//! `STPP_`, and command line flags override those in turn.

use std::env;
use std::fmt;
use std::str::FromStr;

use stpp::DEFAULT_MARKER;

use crate::error::CliError;

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn`, so diagnostics are shown and progress is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes every directive.
    Trace,
    /// Group and clause transitions.
    Debug,
    /// Pass summaries.
    Info,
    /// Diagnostics about malformed input.
    #[default]
    Warn,
    /// Fatal errors only.
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Directive marker: a single printable ASCII character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker(u8);

impl Marker {
    /// The marker as a byte.
    #[must_use]
    pub fn byte(self) -> u8 {
        self.0
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self(DEFAULT_MARKER)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.0))
    }
}

impl FromStr for Marker {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_graphic() => {
                u8::try_from(c).map(Self).map_err(|_| invalid_marker(s))
            }
            _ => Err(invalid_marker(s)),
        }
    }
}

fn invalid_marker(s: &str) -> CliError {
    CliError::InvalidConfig(format!(
        "invalid marker '{s}', expected a single printable ASCII character"
    ))
}

/// Configuration for one run of the tool.
///
/// # Environment Variables
///
/// - `STPP_LOG_LEVEL`: Sets the log level (trace, debug, info, warn, error)
/// - `STPP_MARKER`: Sets the directive marker character
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
    /// Character that introduces a directive.
    pub marker: Marker,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Falls back to defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable contains an invalid
    /// value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let log_level = match lookup("STPP_LOG_LEVEL") {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };

        let marker = match lookup("STPP_MARKER") {
            Some(val) => val.parse()?,
            None => Marker::default(),
        };

        Ok(Self { log_level, marker })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>, marker: Option<Marker>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if let Some(marker) = marker {
            self.marker = marker;
        }

        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("debug", LogLevel::Debug)]
    #[case("info", LogLevel::Info)]
    #[case("warn", LogLevel::Warn)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    #[case("TRACE", LogLevel::Trace)]
    #[case("Debug", LogLevel::Debug)]
    fn log_level_parses_valid_values(#[case] text: &str, #[case] expected: LogLevel) {
        assert_eq!(text.parse::<LogLevel>().ok(), Some(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let result = "loud".parse::<LogLevel>();
        assert!(matches!(
            result,
            Err(CliError::InvalidConfig(message)) if message.contains("unknown log level")
        ));
    }

    #[rstest]
    #[case("#", b'#')]
    #[case("@", b'@')]
    #[case("%", b'%')]
    fn marker_accepts_one_printable_character(#[case] text: &str, #[case] expected: u8) {
        assert_eq!(text.parse::<Marker>().ok().map(Marker::byte), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("##")]
    #[case(" ")]
    #[case("\t")]
    #[case("é")]
    fn marker_rejects_anything_else(#[case] text: &str) {
        assert!(matches!(
            text.parse::<Marker>(),
            Err(CliError::InvalidConfig(message)) if message.contains("invalid marker")
        ));
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.marker.byte(), b'#');
    }

    #[test]
    fn config_reads_variables() -> Result<(), CliError> {
        let config = Config::from_vars(vars(&[("STPP_LOG_LEVEL", "debug"), ("STPP_MARKER", "@")]))?;
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.marker.to_string(), "@");
        Ok(())
    }

    #[test]
    fn config_without_variables_uses_defaults() -> Result<(), CliError> {
        let config = Config::from_vars(vars(&[]))?;
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.marker, Marker::default());
        Ok(())
    }

    #[test]
    fn config_rejects_invalid_variable() {
        let result = Config::from_vars(vars(&[("STPP_MARKER", "ab")]));
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn config_apply_overrides_updates_selected_fields() -> Result<(), CliError> {
        let marker: Marker = "@".parse()?;
        let config = Config::default().apply_overrides(Some(LogLevel::Error), Some(marker));
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.marker, marker);

        let config = Config::default().apply_overrides(None, None);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.marker, Marker::default());
        Ok(())
    }
}
