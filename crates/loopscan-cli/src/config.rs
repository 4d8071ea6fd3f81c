//! Layered run configuration: built-in defaults, then an optional `--config`
//! JSON file, then flags and their environment variables.
use std::path::Path;

use loopscan_core::{
    DEFAULT_MAX_CYCLE_LENGTH, DEFAULT_MAX_SUPERSTEPS, DEFAULT_MIN_CYCLE_LENGTH, RunConfiguration,
    VertexId,
};
use serde::Deserialize;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::io::read_file;

/// Contents of a `--config` file. Every field is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<String>,
    pub min_cycle_length: Option<usize>,
    pub max_cycle_length: Option<usize>,
    pub max_supersteps: Option<u64>,
    pub workers: Option<usize>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// File-access errors from [`read_file`], or [`CliError::ConfigParse`].
    pub fn load(path: &Path, max_size: u64) -> Result<Self, CliError> {
        let text = read_file(path, max_size)?;
        serde_json::from_str(&text).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

/// Builds the [`RunConfiguration`] for a `detect` invocation.
///
/// Range checks are left to the core, which reports them as
/// configuration errors before the first superstep.
///
/// # Errors
///
/// - [`CliError::MissingArgument`] when no layer names a source.
/// - [`CliError::InvalidVertex`] for an invalid source id.
/// - Any error from [`ConfigFile::load`].
pub fn resolve(args: &RunArgs, max_size: u64) -> Result<RunConfiguration, CliError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path, max_size)?,
        None => ConfigFile::default(),
    };
    merge(args, file)
}

fn merge(args: &RunArgs, file: ConfigFile) -> Result<RunConfiguration, CliError> {
    let source = args
        .source
        .clone()
        .or(file.source)
        .ok_or(CliError::MissingArgument {
            name: "source vertex",
        })?;
    let source = VertexId::try_from(source)?;

    let min = args
        .min_length
        .or(file.min_cycle_length)
        .unwrap_or(DEFAULT_MIN_CYCLE_LENGTH);
    let max = args
        .max_length
        .or(file.max_cycle_length)
        .unwrap_or(DEFAULT_MAX_CYCLE_LENGTH);
    let supersteps = args
        .max_supersteps
        .or(file.max_supersteps)
        .unwrap_or(DEFAULT_MAX_SUPERSTEPS);
    let workers = args.workers.or(file.workers).unwrap_or(1);

    Ok(RunConfiguration::new(source)
        .with_lengths(min, max)
        .with_max_supersteps(supersteps)
        .with_workers(workers))
}
