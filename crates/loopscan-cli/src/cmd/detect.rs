//! Implementation of `loopscan detect <file>`.
//!
//! Loads a dataset document, resolves the run configuration from flags,
//! environment and `--config`, runs detection and prints the distinct
//! cycles through the source.
//!
//! Exit codes: 0 = success, 1 = superstep limit hit under
//! `--fail-on-limit`, 2 = input or configuration failure, 3 = engine
//! failure.
use loopscan_core::{
    CycleSink as _, Dataset, DiscoveredCycle, RunConfiguration, RunSummary, Termination,
    TracingSink, detect_cycles,
};

use tracing::debug;

use crate::cli::{OutputFormat, PathOrStdin, RunArgs};
use crate::error::CliError;
use crate::format::{write_cycles_human, write_json, write_summary_human};
use crate::io::load_dataset;
use crate::{Globals, config};

/// Runs the `detect` command.
///
/// # Errors
///
/// - Exit code 2 for read, parse and configuration failures.
/// - [`CliError::SuperstepLimit`] (exit code 1) when `fail_on_limit` is set
///   and the run was cut short.
pub fn run(
    file: &PathOrStdin,
    args: &RunArgs,
    fail_on_limit: bool,
    globals: &Globals,
) -> Result<(), CliError> {
    let dataset = load_dataset(file, globals.max_file_size)?;
    let config = config::resolve(args, globals.max_file_size)?;
    debug!(
        vertices = dataset.vertices.len(),
        edges = dataset.edges.len(),
        ?config,
        "starting detection"
    );
    let summary = execute(&dataset, config, globals)?;

    if fail_on_limit && summary.termination == Termination::SuperstepLimitReached {
        return Err(CliError::SuperstepLimit {
            supersteps: summary.supersteps,
        });
    }
    Ok(())
}

/// Runs detection and writes the result in the selected format.
///
/// Each cycle is also logged through [`TracingSink`] as it is found, which
/// shows up on stderr under `--verbose`.
///
/// # Errors
///
/// [`CliError::Detection`] if the run refuses to start, or
/// [`CliError::IoError`] if stdout or stderr cannot be written.
pub fn execute(
    dataset: &Dataset,
    config: RunConfiguration,
    globals: &Globals,
) -> Result<RunSummary, CliError> {
    let mut cycles: Vec<DiscoveredCycle> = Vec::new();
    let mut log = TracingSink;
    let sink = |cycle: &DiscoveredCycle| {
        log.report(cycle);
        cycles.push(cycle.clone());
    };
    let (summary, _) = detect_cycles(dataset, config, sink)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match globals.format {
        OutputFormat::Human => write_cycles_human(&mut out, &cycles),
        OutputFormat::Json => write_json(&mut out, &cycles, &summary),
    }
    .map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })?;

    if globals.format == OutputFormat::Human && !globals.quiet {
        let stderr = std::io::stderr();
        write_summary_human(&mut stderr.lock(), &summary).map_err(|e| CliError::IoError {
            source: "stderr".to_owned(),
            detail: e.to_string(),
        })?;
    }

    Ok(summary)
}
