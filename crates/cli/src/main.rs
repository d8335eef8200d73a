// payload-report - classify governance payload batches and report what they do

mod changed;
mod exit_codes;
mod run;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;
use run::InputArgs;

#[derive(Parser)]
#[command(name = "payload-report")]
#[command(about = "Classify governance payload batches and write per-file reports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Debug logging (RUST_LOG still wins)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify batches, write reports and the weekly snapshot file
    #[command(after_help = "\
Examples:
  payload-report run
  payload-report run BIPs/2024-W07/BIP-512.json --no-snapshot
  payload-report run --pr --root .
  payload-report run --json > merged.json")]
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Do not write the snapshot options file
        #[arg(long)]
        no_snapshot: bool,
    },

    /// Show which transactions each batch leaves unclassified, without writing
    #[command(after_help = "\
Examples:
  payload-report coverage
  payload-report coverage BIPs/2024-W07/BIP-512.json --json")]
    Coverage {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { input, no_snapshot } => run::cmd_run(input, no_snapshot),
        Commands::Coverage { input } => run::cmd_coverage(input),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(exit_codes::EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
