//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in error messages: `"-"` for stdin, otherwise the path.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` prints one line per cycle to stdout and a summary line to stderr.
/// `Json` prints a single object holding the cycles and the run summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (default).
    Human,
    /// One JSON document on stdout.
    Json,
}

/// Run parameters shared by `detect`. Every flag has an environment
/// fallback; unset values come from `--config`, then the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Vertex whose cycles are searched for.
    #[arg(long, short = 's', env = "LOOPSCAN_SOURCE", value_name = "VERTEX")]
    pub source: Option<String>,

    /// Shortest cycle to report, in edges (at least 2; default 3).
    #[arg(long, env = "LOOPSCAN_MIN_LENGTH", value_name = "N")]
    pub min_length: Option<usize>,

    /// Path length at which tokens are dropped (default 5). The longest
    /// reportable cycle has one edge fewer.
    #[arg(long, env = "LOOPSCAN_MAX_LENGTH", value_name = "N")]
    pub max_length: Option<usize>,

    /// Upper bound on rounds before the run is cut short (default 100).
    #[arg(long, env = "LOOPSCAN_MAX_SUPERSTEPS", value_name = "N")]
    pub max_supersteps: Option<u64>,

    /// Threads used per round; 1 runs every round on the calling thread.
    #[arg(long, short = 'j', env = "LOOPSCAN_WORKERS", value_name = "N")]
    pub workers: Option<usize>,

    /// JSON file with default run parameters. Flags override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// All top-level subcommands exposed by the `loopscan` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find simple cycles through a source vertex in a dataset file.
    Detect {
        /// Path to a dataset JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,

        #[command(flatten)]
        run: RunArgs,

        /// Exit with code 1 if the superstep limit cut the run short.
        #[arg(long)]
        fail_on_limit: bool,
    },

    /// Run detection on the built-in seven-vertex sample graph.
    Demo,

    /// Print the loopscan-core library version.
    Version,
}

/// Root CLI struct for the `loopscan` binary.
///
/// All global flags are marked `global = true` so that clap propagates them
/// to every subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "loopscan",
    version,
    about = "Superstep cycle detection",
    long_about = "Finds simple directed cycles that pass through a chosen source vertex,\n\
                  propagating path tokens between vertices in synchronized rounds."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr and skip the summary line (incompatible
    /// with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every superstep to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `LOOPSCAN_MAX_FILE_SIZE` environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "LOOPSCAN_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,
}
