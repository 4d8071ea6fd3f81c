//! `loopscan` command-line entry point.
use clap::Parser as _;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod config;
mod error;
mod format;
mod io;

use cli::{Cli, Command, OutputFormat};
use error::CliError;

/// Global flags every command needs, detached from the clap structs.
#[derive(Debug, Clone, Copy)]
pub struct Globals {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub max_file_size: u64,
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects `debug`, `-q` selects
/// `error` and the default is `warn`.
fn init_tracing(globals: &Globals) {
    let default = if globals.verbose {
        "debug"
    } else if globals.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        eprintln!("warning: log subscriber already installed");
    }
}

fn dispatch(command: &Command, globals: &Globals) -> Result<(), CliError> {
    match command {
        Command::Detect {
            file,
            run,
            fail_on_limit,
        } => cmd::detect::run(file, run, *fail_on_limit, globals),
        Command::Demo => cmd::demo::run(globals),
        Command::Version => {
            println!("{}", loopscan_core::version());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let globals = Globals {
        format: cli.format,
        quiet: cli.quiet,
        verbose: cli.verbose,
        max_file_size: cli.max_file_size,
    };
    init_tracing(&globals);

    if let Err(e) = dispatch(&cli.command, &globals) {
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }
}
