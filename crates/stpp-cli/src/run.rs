//! One invocation of the tool: open the streams and run a pass.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use stpp::{Preprocessor, Report, TagContext};

use crate::cli::Args;
use crate::config::Config;
use crate::error::CliError;

/// Merge environment configuration with command line overrides.
///
/// # Errors
///
/// Returns `CliError::InvalidConfig` if an environment variable contains an
/// invalid value.
pub fn build_config(args: &Args) -> Result<Config, CliError> {
    let config = Config::from_env()?;
    Ok(config.apply_overrides(args.log_level, args.marker))
}

/// Run a single pass from the selected input to the selected output.
///
/// The output is flushed even when the pass fails, so text written before a
/// fatal error reaches the destination.
///
/// # Errors
///
/// Returns an error when a stream cannot be opened, when the pass fails, or
/// when flushing the output fails.
pub fn run(args: &Args, config: &Config) -> Result<Report, CliError> {
    let _span = tracing::info_span!(
        "pass",
        input = %display_path(args.input_path()),
        output = %display_path(args.output_path())
    )
    .entered();
    let mut tags: TagContext = args.definitions.iter().map(String::as_str).collect();
    let input = open_input(args.input_path())?;
    let mut output = open_output(args.output_path())?;

    let result = Preprocessor::new()
        .with_marker(config.marker.byte())
        .run(input, &mut output, &mut tags);
    let flushed = output.flush();
    let report = result?;
    flushed?;

    tracing::info!(
        diagnostics = report.diagnostics().len(),
        tags = tags.len(),
        "pass complete"
    );
    Ok(report)
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "-".to_owned(), |path| path.display().to_string())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdin().lock()));
    };
    let file = File::open(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>, CliError> {
    let Some(path) = path else {
        return Ok(BufWriter::new(Box::new(io::stdout().lock())));
    };
    let file = File::create(path).map_err(|source| CliError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(Box::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use eyre::Result;
    use stpp::EngineError;

    fn args_for(input: PathBuf, output: PathBuf, definitions: &[&str]) -> Args {
        Args {
            definitions: definitions.iter().map(|tag| (*tag).to_owned()).collect(),
            input: Some(input),
            output: Some(output),
            ..Args::default()
        }
    }

    #[test]
    fn runs_a_pass_between_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "#if A\nyes\n#else\nno\n#endif\n")?;

        let report = run(&args_for(input, output.clone(), &["A"]), &Config::default())?;

        assert!(report.is_clean());
        assert_eq!(fs::read_to_string(output)?, "yes\n");
        Ok(())
    }

    #[test]
    fn partial_output_is_flushed_on_failure() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "kept\n#define\nlost\n")?;

        let result = run(&args_for(input, output.clone(), &[]), &Config::default());

        assert!(matches!(
            result,
            Err(CliError::Engine(EngineError::MissingTagName { line: 2, .. }))
        ));
        assert_eq!(fs::read_to_string(output)?, "kept\n");
        Ok(())
    }

    #[test]
    fn missing_input_is_reported_with_its_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("absent.txt");
        let output = dir.path().join("out.txt");

        let result = run(&args_for(input.clone(), output.clone(), &[]), &Config::default());

        assert!(matches!(result, Err(CliError::OpenInput { path, .. }) if path == input));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn configured_marker_is_used() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "%if A\n#if\n%endif\n")?;
        let config = Config::default().apply_overrides(None, Some("%".parse()?));

        run(&args_for(input, output.clone(), &["A"]), &config)?;

        assert_eq!(fs::read_to_string(output)?, "#if\n");
        Ok(())
    }
}
