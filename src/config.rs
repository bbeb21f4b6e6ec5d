//! Run configuration: the report wording file and the delivery mode.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{DeltasError, DeltasResult};

/// Beginning of every report body; followed by the report identity.
pub const DEFAULT_TITLE: &str = "Memory usage change @ ";

pub const DEFAULT_EXPLANATION: &str = "The following tables show the memory usage change of each \
    example sketch compared to the baseline build: summary by target first, then per sketch.";

/// Path segment removed from the start of sketch names in the detail table.
pub const DEFAULT_STRIP_PREFIX: &str = "libraries/";

/// Comment bodies are stored as a mediumblob on GitHub, capped at this many characters.
pub const MAX_COMMENT_LENGTH: usize = 262_144;

/// Wording and limits of the rendered report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub explanation: String,
    pub strip_prefix: String,
    pub max_length: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: DEFAULT_TITLE.to_string(),
            explanation: DEFAULT_EXPLANATION.to_string(),
            strip_prefix: DEFAULT_STRIP_PREFIX.to_string(),
            max_length: MAX_COMMENT_LENGTH,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    report: Option<ReportConfig>,
}

/// Load the `[report]` table of a TOML config file.
///
/// A file without a `[report]` table yields the defaults.
pub fn load_report_config(path: &Path) -> DeltasResult<ReportConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| DeltasError::Config(format!("failed to read {}: {e}", path.display())))?;
    parse_report_config(&s)
        .map_err(|e| DeltasError::Config(format!("failed to parse {}: {e}", path.display())))
}

fn parse_report_config(s: &str) -> Result<ReportConfig, toml::de::Error> {
    let cfg: ConfigFile = toml::from_str(s)?;
    Ok(cfg.report.unwrap_or_default())
}

/// Where the rendered report goes, chosen once from the triggering event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Comment on the pull request that triggered the run
    PullRequest { number: u64 },
    /// Comment on a pull request from a follow-up workflow (fork PRs)
    WorkflowRun { number: u64 },
    /// Write the report to a file on a scheduled run
    Schedule { destination: PathBuf },
    /// Write the report to a file after a push
    Push { destination: PathBuf },
}

impl Mode {
    /// Select the mode from an event name such as `pull_request` or `schedule`.
    ///
    /// Pull request modes need `pr_number`; file modes need `destination`.
    pub fn from_event_name(
        event: &str,
        pr_number: Option<u64>,
        destination: Option<PathBuf>,
    ) -> DeltasResult<Mode> {
        let require_number = |event: &str| {
            pr_number.ok_or_else(|| {
                DeltasError::Config(format!("{event} mode requires a pull request number"))
            })
        };
        let require_destination = |event: &str| {
            destination.clone().ok_or_else(|| {
                DeltasError::Config(format!("{event} mode requires a destination file"))
            })
        };

        match event.replace('-', "_").as_str() {
            "pull_request" => Ok(Mode::PullRequest {
                number: require_number(event)?,
            }),
            "workflow_run" => Ok(Mode::WorkflowRun {
                number: require_number(event)?,
            }),
            "schedule" => Ok(Mode::Schedule {
                destination: require_destination(event)?,
            }),
            "push" => Ok(Mode::Push {
                destination: require_destination(event)?,
            }),
            other => Err(DeltasError::Config(format!(
                "unsupported event '{other}' (expected pull_request, workflow_run, schedule or push)"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::PullRequest { .. } => "pull_request",
            Mode::WorkflowRun { .. } => "workflow_run",
            Mode::Schedule { .. } => "schedule",
            Mode::Push { .. } => "push",
        }
    }

    /// Pull request the report is meant for, if any.
    pub fn pull_request(&self) -> Option<u64> {
        match self {
            Mode::PullRequest { number } | Mode::WorkflowRun { number } => Some(*number),
            Mode::Schedule { .. } | Mode::Push { .. } => None,
        }
    }
}
