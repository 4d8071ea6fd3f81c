//! Implementation of `loopscan demo`.
//!
//! Runs detection over [`Dataset::sample`] with source `A`, cycle lengths
//! 3 to 5, at most 100 supersteps and four workers. Useful as a smoke test
//! of an installed binary; the expected output is the two triangles through
//! `A`.
use loopscan_core::{Dataset, RunConfiguration, VertexId};

use crate::Globals;
use crate::cmd::detect;
use crate::error::CliError;

/// Source vertex of the demo run.
pub const DEMO_SOURCE: &str = "A";

/// Worker count used by the demo run.
pub const DEMO_WORKERS: usize = 4;

/// Builds the demo configuration.
///
/// # Errors
///
/// [`CliError::InvalidVertex`] if [`DEMO_SOURCE`] is not a valid id.
pub fn demo_config() -> Result<RunConfiguration, CliError> {
    let source = VertexId::try_from(DEMO_SOURCE)?;
    Ok(RunConfiguration::new(source)
        .with_lengths(3, 5)
        .with_max_supersteps(100)
        .with_workers(DEMO_WORKERS))
}

/// Runs the `demo` command.
///
/// # Errors
///
/// Returns [`CliError`] if output cannot be written.
pub fn run(globals: &Globals) -> Result<(), CliError> {
    detect::execute(&Dataset::sample(), demo_config()?, globals).map(|_| ())
}
