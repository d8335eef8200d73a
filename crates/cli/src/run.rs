//! `payload-report run` / `payload-report coverage`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use payload_config::{commit_from_env, RunSettings, SnapshotConfig};
use payload_core::Batch;
use payload_io::{
    discover_batches, load_batches, write_batch_reports, write_combined_report, write_snapshot,
    JsonAddressBook, JsonChainState, LoadError,
};
use payload_recon::{
    derive_snapshot_options, ClassifyContext, GridRenderer, Network, Pipeline, PipelineOutput,
    ReportSet,
};

use crate::changed::{changed_payloads, PullRequest};
use crate::exit_codes::{EXIT_EMPTY_REPORT, EXIT_ERROR, EXIT_NO_BATCHES, EXIT_PR_DISCOVERY, EXIT_WRITE};
use crate::CliError;

const GAUGE_ADD: &str = "gauge_add";

/// Options shared by both commands.
#[derive(Debug, Clone, clap::Args)]
pub struct InputArgs {
    /// Payload files, relative to the root. Defaults to every file under BIPs/
    pub paths: Vec<PathBuf>,

    /// Only payloads changed in the pull request (GITHUB_REPOSITORY, PR_NUMBER)
    #[arg(long, conflicts_with = "paths")]
    pub pr: bool,

    /// Settings file (TOML)
    #[arg(long, env = "PAYLOAD_REPORT_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Repository root, overriding the settings file
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Print JSON to stdout instead of a human summary
    #[arg(long)]
    pub json: bool,
}

fn load_settings(args: &InputArgs) -> Result<RunSettings, CliError> {
    let settings = RunSettings::load(args.settings.as_deref()).map_err(|e| {
        CliError::usage(e.to_string()).with_hint("fix the settings file or pass --settings")
    })?;
    Ok(match &args.root {
        Some(root) => settings.with_root(root.clone()),
        None => settings,
    })
}

fn select_paths(args: &InputArgs, root: &Path) -> Result<Vec<PathBuf>, CliError> {
    if args.pr {
        let pr = PullRequest::from_env().map_err(|e| {
            CliError::new(EXIT_PR_DISCOVERY, e.to_string())
                .with_hint("--pr needs GITHUB_REPOSITORY and PR_NUMBER")
        })?;
        return changed_payloads(&pr, root).map_err(|e| CliError::new(EXIT_PR_DISCOVERY, e.to_string()));
    }
    if !args.paths.is_empty() {
        return Ok(args.paths.clone());
    }
    match discover_batches(root) {
        Ok(paths) => Ok(paths),
        Err(LoadError::Missing { path }) => Err(CliError::new(
            EXIT_NO_BATCHES,
            format!("no payload directory at {}", path.display()),
        )
        .with_hint("pass payload paths or --root")),
        Err(e) => Err(CliError::new(EXIT_ERROR, e.to_string())),
    }
}

fn load_inputs(args: &InputArgs, settings: &RunSettings) -> Result<Vec<Batch>, CliError> {
    let paths = select_paths(args, &settings.root)?;
    if paths.is_empty() {
        return Err(CliError::new(EXIT_NO_BATCHES, "no payload files to process"));
    }
    let batches = load_batches(&settings.root, &paths);
    if batches.is_empty() {
        return Err(CliError::new(
            EXIT_NO_BATCHES,
            format!("none of {} payload file(s) could be loaded", paths.len()),
        ));
    }
    Ok(batches)
}

/// File-backed lookups for one run.
struct Lookups {
    book: JsonAddressBook,
    state: JsonChainState,
}

impl Lookups {
    fn load(settings: &RunSettings) -> Result<Self, CliError> {
        let book = JsonAddressBook::load_or_empty(&settings.address_book_path())
            .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        let state = JsonChainState::load_or_empty(&settings.chain_state_path())
            .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        Ok(Self { book, state })
    }

    fn run(&self, batches: &[Batch]) -> PipelineOutput {
        let network = Network::new(&self.state);
        let ctx = ClassifyContext::new(&self.book, &self.book, &network);
        let renderer = GridRenderer::new(commit_from_env(), &self.book);
        Pipeline::new(ctx, &renderer).run(batches)
    }
}

fn write_err(e: payload_io::WriteError) -> CliError {
    CliError::new(EXIT_WRITE, e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    writeln!(io::stdout().lock(), "{text}").map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))
}

pub fn cmd_run(args: InputArgs, no_snapshot: bool) -> Result<(), CliError> {
    let settings = load_settings(&args)?;
    let batches = load_inputs(&args, &settings)?;
    let lookups = Lookups::load(&settings)?;
    let output = lookups.run(&batches);

    if output.merged.is_empty() {
        log::error!("{} batch(es) loaded but the report is empty", batches.len());
        return Err(CliError::new(EXIT_EMPTY_REPORT, "report is empty"));
    }

    let written = write_batch_reports(&settings.root, &output.merged).map_err(write_err)?;
    let combined = settings.reports_path();
    write_combined_report(&combined, &output.merged).map_err(write_err)?;
    log::info!("wrote {} report(s) and {}", written.len(), combined.display());

    if !no_snapshot {
        let config = SnapshotConfig::load(&settings.snapshot_config_path());
        let options = output
            .reports_for(GAUGE_ADD)
            .map(|set| derive_snapshot_options(set, &config))
            .unwrap_or_else(|| derive_snapshot_options(&ReportSet::new(GAUGE_ADD), &config));
        let today = chrono::Utc::now().date_naive();
        let path = write_snapshot(&settings.snapshot_dir_path(), today, &options).map_err(write_err)?;
        log::info!("wrote {} snapshot option(s) to {}", options.options.len(), path.display());
    }

    if args.json {
        print_json(&output.merged)?;
    } else {
        let mut out = io::stdout().lock();
        for path in &written {
            writeln!(out, "{}", path.display()).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CoverageLine<'a> {
    file_name: &'a str,
    covered: Vec<usize>,
    uncovered: Vec<usize>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct CoverageDocument<'a> {
    batches: Vec<CoverageLine<'a>>,
    errors: Vec<String>,
}

fn join(indices: &[usize]) -> String {
    indices.iter().map(usize::to_string).collect::<Vec<_>>().join(",")
}

pub fn cmd_coverage(args: InputArgs) -> Result<(), CliError> {
    let settings = load_settings(&args)?;
    let batches = load_inputs(&args, &settings)?;
    let lookups = Lookups::load(&settings)?;
    let output = lookups.run(&batches);

    let document = CoverageDocument {
        batches: output
            .coverage
            .batches
            .iter()
            .map(|set| CoverageLine {
                file_name: &set.file_name,
                covered: set.covered.iter().copied().collect(),
                uncovered: set.uncovered().into_iter().collect(),
                total: set.total,
            })
            .collect(),
        errors: output.coverage.errors.iter().map(ToString::to_string).collect(),
    };

    if args.json {
        return print_json(&document);
    }
    let mut out = io::stdout().lock();
    let io_err = |e: io::Error| CliError::new(EXIT_ERROR, e.to_string());
    for line in &document.batches {
        writeln!(
            out,
            "{}\tcovered [{}]\tuncovered [{}]\ttotal {}",
            line.file_name,
            join(&line.covered),
            join(&line.uncovered),
            line.total
        )
        .map_err(io_err)?;
    }
    for error in &document.errors {
        writeln!(out, "skipped: {error}").map_err(io_err)?;
    }
    Ok(())
}
