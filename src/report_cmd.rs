//! Report command: load shards, diff against the baseline, render and deliver.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{Mode, ReportConfig};
use crate::engine::{compute_deltas, consolidate};
use crate::publish::{self, DeliveryStatus};
use crate::report::{self, ReportOutcome, marker};
use crate::storage::{CsvExporter, ShardLoader};
use crate::{DeltasError, DeltasResult};

/// Inputs of a report render.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory of the current build's sketches reports
    pub reports_dir: PathBuf,
    /// Directory of the baseline build's sketches reports
    pub baseline_dir: Option<PathBuf>,
    /// Identity for the report marker; defaults to the shards' commit hash
    pub commit_hash: Option<String>,
    pub report: ReportConfig,
}

/// Configuration for the report command
#[derive(Debug, Clone)]
pub struct ReportCmdConfig {
    pub render: RenderConfig,
    pub mode: Mode,
    /// Comment payload destination for pull request modes (stdout if unset)
    pub out: Option<PathBuf>,
    /// JSON file with the bodies of comments already on the pull request
    pub existing_comments: Option<PathBuf>,
    /// Write the computed deltas as JSON
    pub json_out: Option<PathBuf>,
    /// Write the report tables as CSV
    pub csv_out: Option<PathBuf>,
}

/// Load, consolidate, diff and render.
///
/// Returns `ReportOutcome::NoData` when the current reports carry no size
/// data.
pub fn render(config: &RenderConfig) -> DeltasResult<ReportOutcome> {
    let current = ShardLoader::new(&config.reports_dir).load()?;
    if current.is_empty() {
        return Ok(ReportOutcome::NoData);
    }

    let baseline = match &config.baseline_dir {
        Some(dir) => {
            let loaded = ShardLoader::new(dir).load()?;
            if loaded.is_empty() {
                warn!(dir = %dir.display(), "baseline reports carry no size data");
                None
            } else {
                Some(consolidate(loaded.groups))
            }
        }
        None => None,
    };

    let identity = config
        .commit_hash
        .clone()
        .or_else(|| current.commit_hash.clone());
    let boards = consolidate(current.groups);
    let deltas = compute_deltas(&boards, baseline.as_deref());

    info!(
        boards = deltas.boards.len(),
        samples = deltas.records.len(),
        missing_baselines = deltas.missing_baselines(),
        failed_compilations = deltas.failed_compilations(),
        "computed size deltas"
    );

    let rendered = report::render(deltas, identity.as_deref(), &config.report)?;
    Ok(ReportOutcome::Rendered(Box::new(rendered)))
}

/// Main entry point for the report command
pub fn run(config: ReportCmdConfig) -> DeltasResult<Option<DeliveryStatus>> {
    let outcome = render(&config.render)?;
    let Some(rendered) = outcome.rendered() else {
        info!("no size deltas data found, nothing to report");
        return Ok(None);
    };

    if let Some(ref json_path) = config.json_out {
        let json = serde_json::to_string_pretty(&rendered.deltas)
            .map_err(|e| DeltasError::Message(format!("failed to serialize deltas: {e}")))?;
        std::fs::write(json_path, json).map_err(|e| {
            DeltasError::Message(format!("failed to write {}: {e}", json_path.display()))
        })?;
        info!(path = %json_path.display(), "wrote deltas JSON");
    }

    if let Some(ref csv_path) = config.csv_out {
        CsvExporter::new().export(
            &[&rendered.summary, &rendered.status, &rendered.detail],
            csv_path,
        )?;
        info!(path = %csv_path.display(), "wrote tables CSV");
    }

    let existing = match &config.existing_comments {
        Some(path) => publish::load_existing_comments(path)?,
        None => Vec::new(),
    };

    info!(
        mode = config.mode.name(),
        pull_request = ?config.mode.pull_request(),
        "delivering report"
    );
    let report_marker = marker(&config.render.report.title, &rendered.comment.identity);
    let status = publish::deliver(
        &config.mode,
        &rendered.comment,
        &report_marker,
        config.out.as_deref(),
        &existing,
    )?;

    Ok(Some(status))
}
