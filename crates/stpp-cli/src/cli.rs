//! Command line arguments.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{LogLevel, Marker};

/// Conditional text preprocessor.
///
/// Copies INPUT to OUTPUT, keeping or dropping lines according to `#if`,
/// `#elif`, `#else` and `#endif` directives over a set of tags that
/// `#define` and `#undef` modify.
#[derive(Parser, Debug, Default)]
#[command(name = "stpp", version, about)]
pub struct Args {
    /// Define TAG before processing. May be repeated.
    #[arg(short = 'D', long = "definition", value_name = "TAG")]
    pub definitions: Vec<String>,

    /// Character that introduces a directive.
    #[arg(long, value_name = "CHAR")]
    pub marker: Option<Marker>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Input file. Standard input when absent or `-`.
    pub input: Option<PathBuf>,

    /// Output file. Standard output when absent or `-`.
    pub output: Option<PathBuf>,
}

impl Args {
    /// The input file to open, or `None` for standard input.
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        named(self.input.as_deref())
    }

    /// The output file to create, or `None` for standard output.
    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        named(self.output.as_deref())
    }
}

fn named(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| *path != Path::new("-") && *path != Path::new("--"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("stpp").chain(args.iter().copied()))
    }

    #[test]
    fn definitions_accumulate() -> Result<(), clap::Error> {
        let args = parse(&["-D", "A", "--definition", "B", "-DC"])?;
        assert_eq!(args.definitions, ["A", "B", "C"]);
        Ok(())
    }

    #[rstest]
    #[case(&[], None, None)]
    #[case(&["in.txt"], Some("in.txt"), None)]
    #[case(&["in.txt", "out.txt"], Some("in.txt"), Some("out.txt"))]
    #[case(&["-", "out.txt"], None, Some("out.txt"))]
    #[case(&["in.txt", "-"], Some("in.txt"), None)]
    #[case(&["--", "--", "--"], None, None)]
    fn dash_selects_standard_streams(
        #[case] argv: &[&str],
        #[case] input: Option<&str>,
        #[case] output: Option<&str>,
    ) -> Result<(), clap::Error> {
        let args = parse(argv)?;
        assert_eq!(args.input_path(), input.map(Path::new));
        assert_eq!(args.output_path(), output.map(Path::new));
        Ok(())
    }

    #[test]
    fn third_positional_is_rejected() {
        assert!(parse(&["a", "b", "c"]).is_err());
    }

    #[test]
    fn marker_and_log_level_are_parsed() -> Result<(), clap::Error> {
        let args = parse(&["--marker", "@", "--log-level", "DEBUG"])?;
        assert_eq!(args.marker.map(Marker::byte), Some(b'@'));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        Ok(())
    }

    #[test]
    fn invalid_marker_is_rejected() {
        assert!(parse(&["--marker", "ab"]).is_err());
    }
}
