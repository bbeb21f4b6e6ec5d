#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use report_size_deltas::config::{Mode, ReportConfig, load_report_config};
use report_size_deltas::publish::DeliveryStatus;
use report_size_deltas::report_cmd::{self, RenderConfig, ReportCmdConfig};
use report_size_deltas::{DeltasError, DeltasResult};

#[derive(Parser, Debug)]
#[command(name = "report-size-deltas")]
#[command(about = "Report memory usage deltas of compiled Arduino sketches", long_about = None)]
struct Cli {
    /// Directory of sketches report JSON files for the current build
    #[arg(long)]
    reports: PathBuf,
    /// Directory of sketches report JSON files for the baseline build
    #[arg(long)]
    baseline: Option<PathBuf>,
    /// Delivery mode (pull-request, workflow-run, schedule, push)
    #[arg(long, conflicts_with = "event_name")]
    mode: Option<String>,
    /// CI event name that triggered the run; selects the mode
    #[arg(long)]
    event_name: Option<String>,
    /// Pull request to comment on
    #[arg(long)]
    pr_number: Option<u64>,
    /// Report file for schedule and push modes
    #[arg(long)]
    destination: Option<PathBuf>,
    /// Write the comment payload here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// JSON array of comments already posted on the pull request
    #[arg(long)]
    existing_comments: Option<PathBuf>,
    /// Identity of the report (defaults to the reports' commit hash)
    #[arg(long)]
    commit_hash: Option<String>,
    /// Write machine-readable JSON deltas to this file
    #[arg(long)]
    json: Option<PathBuf>,
    /// Write the report tables as CSV to this file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// TOML file with a [report] table
    #[arg(long)]
    config: Option<PathBuf>,
    /// Enable verbose logging (or set SIZE_DELTAS_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("SIZE_DELTAS_LOG").unwrap_or_else(|_| {
        if verbose {
            "report_size_deltas=debug".to_string()
        } else {
            "report_size_deltas=info".to_string()
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn select_mode(cli: &Cli) -> DeltasResult<Mode> {
    let event = cli
        .mode
        .as_deref()
        .or(cli.event_name.as_deref())
        .ok_or_else(|| DeltasError::Config("one of --mode or --event-name is required".into()))?;
    Mode::from_event_name(event, cli.pr_number, cli.destination.clone())
}

fn run(cli: Cli) -> DeltasResult<()> {
    let mode = select_mode(&cli)?;
    let report = match &cli.config {
        Some(path) => load_report_config(path)?,
        None => ReportConfig::default(),
    };

    let config = ReportCmdConfig {
        render: RenderConfig {
            reports_dir: cli.reports,
            baseline_dir: cli.baseline,
            commit_hash: cli.commit_hash,
            report,
        },
        mode,
        out: cli.out,
        existing_comments: cli.existing_comments,
        json_out: cli.json,
        csv_out: cli.csv,
    };

    match report_cmd::run(config)? {
        Some(DeliveryStatus::Written(path)) => {
            tracing::info!(path = %path.display(), "report delivered")
        }
        Some(DeliveryStatus::Printed) => {}
        Some(DeliveryStatus::AlreadyPosted) => tracing::info!("report already posted"),
        None => {}
    }
    Ok(())
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
