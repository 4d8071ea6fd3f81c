/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `loopscan` binary. Every
/// variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2**: the input could not be turned into a run. Unreadable
///   files, malformed datasets and out-of-range configuration all fail here,
///   before the first superstep.
/// - Exit code **1**: the run completed but `--fail-on-limit` was given and
///   the superstep bound cut it short.
/// - Exit code **3**: the engine itself failed (worker pool did not start,
///   or the coordinator broke an internal invariant). Not the user's input.
use std::fmt;
use std::path::PathBuf;

use loopscan_core::{DetectError, InvalidVertexId};

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `loopscan` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// A human-readable label for the source.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the variants above.
    IoError {
        /// A human-readable label for the source or sink.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The input is not a dataset document.
    DatasetParse {
        /// A human-readable label for the source.
        source: String,
        /// The `serde_json` error.
        detail: String,
    },

    /// A `--config` file is malformed or names an unknown field.
    ConfigParse {
        /// The configuration file path.
        path: PathBuf,
        /// The `serde_json` error.
        detail: String,
    },

    /// A vertex id given on the command line, in the environment or in a
    /// config file is empty or padded with whitespace.
    InvalidVertex(InvalidVertexId),

    /// Something was missing before the run could start, such as the source
    /// vertex when neither the flag nor the config file sets it.
    MissingArgument {
        /// Name of the missing setting.
        name: &'static str,
    },

    /// The detection run failed. Exit code 2 for input and configuration
    /// errors, 3 for engine failures.
    Detection(DetectError),

    // --- Exit code 1: logical failures ---
    /// `--fail-on-limit` was set and the run hit `max_supersteps`.
    ///
    /// The partial results have already been printed.
    SuperstepLimit {
        /// Rounds executed before stopping.
        supersteps: u64,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::DatasetParse { .. }
            | Self::ConfigParse { .. }
            | Self::InvalidVertex(_)
            | Self::MissingArgument { .. } => 2,

            Self::Detection(e) => {
                if e.is_input_error() {
                    2
                } else {
                    3
                }
            }

            Self::SuperstepLimit { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::DatasetParse { source, detail } => {
                format!("error: {source} is not a valid dataset: {detail}")
            }
            Self::ConfigParse { path, detail } => {
                format!("error: invalid config file {}: {detail}", path.display())
            }
            Self::InvalidVertex(e) => format!("error: {e}"),
            Self::MissingArgument { name } => {
                format!("error: no {name} given (use a flag, env var or --config)")
            }
            Self::Detection(e) => format!("error: {e}"),
            Self::SuperstepLimit { supersteps } => {
                format!("error: superstep limit reached after {supersteps} rounds")
            }
        }
    }
}

impl From<InvalidVertexId> for CliError {
    fn from(e: InvalidVertexId) -> Self {
        Self::InvalidVertex(e)
    }
}

impl From<DetectError> for CliError {
    fn from(e: DetectError) -> Self {
        Self::Detection(e)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
