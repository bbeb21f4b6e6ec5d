//! Delivery of an assembled report to its destination.
//!
//! Pull request modes hand a comment payload to the posting step (a file or
//! stdout); schedule and push modes write the Markdown report to a file.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Mode;
use crate::report::comment::{CommentReport, report_exists};
use crate::{DeltasError, DeltasResult};

/// Request body for posting a pull request comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub pull_request: u64,
    pub body: String,
}

/// What happened to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Written to the given file
    Written(PathBuf),
    /// Printed to stdout
    Printed,
    /// An existing comment already carries this report's marker
    AlreadyPosted,
}

/// Existing comment, as a bare body string or an API comment object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExistingComment {
    Body(String),
    Object { body: String },
}

/// Load the bodies of comments already posted on the pull request.
///
/// The file holds a JSON array of strings or of objects with a `body` key.
pub fn load_existing_comments(path: &Path) -> DeltasResult<Vec<String>> {
    let bytes = std::fs::read(path)
        .map_err(|e| DeltasError::Message(format!("failed to read {}: {e}", path.display())))?;
    let comments: Vec<ExistingComment> = serde_json::from_slice(&bytes).map_err(|e| {
        DeltasError::Message(format!("failed to parse comments {}: {e}", path.display()))
    })?;
    Ok(comments
        .into_iter()
        .map(|c| match c {
            ExistingComment::Body(body) | ExistingComment::Object { body } => body,
        })
        .collect())
}

/// Format a timestamp the way report files are stamped (`Oct-19-2026 14:05:09`).
pub fn generated_on(now: time::OffsetDateTime) -> DeltasResult<String> {
    let format = time::macros::format_description!(
        "[month repr:short]-[day]-[year] [hour]:[minute]:[second]"
    );
    now.format(format)
        .map_err(|e| DeltasError::Message(format!("failed to format timestamp: {e}")))
}

/// Write the report body followed by its generation stamp.
pub fn write_report_file(path: &Path, body: &str, generated_on: &str) -> DeltasResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| {
                DeltasError::Message(format!("failed to create directory {}: {e}", dir.display()))
            })?;
        }
    }
    let content = format!("{body}\nGenerated on: {generated_on} UTC\n");
    std::fs::write(path, content)
        .map_err(|e| DeltasError::Message(format!("failed to write {}: {e}", path.display())))
}

/// Deliver a report according to the run mode.
///
/// For pull request modes the payload goes to `out` (or stdout), unless one
/// of `existing` comments already starts with the report's marker.
pub fn deliver(
    mode: &Mode,
    report: &CommentReport,
    marker: &str,
    out: Option<&Path>,
    existing: &[String],
) -> DeltasResult<DeliveryStatus> {
    match mode {
        Mode::PullRequest { number } | Mode::WorkflowRun { number } => {
            if report_exists(existing.iter().map(String::as_str), marker) {
                info!(pull_request = number, "report already posted, skipping");
                return Ok(DeliveryStatus::AlreadyPosted);
            }

            let payload = CommentPayload {
                pull_request: *number,
                body: report.body.clone(),
            };
            let json = serde_json::to_string_pretty(&payload)
                .map_err(|e| DeltasError::Message(format!("failed to serialize comment: {e}")))?;

            match out {
                Some(path) => {
                    std::fs::write(path, json).map_err(|e| {
                        DeltasError::Message(format!("failed to write {}: {e}", path.display()))
                    })?;
                    info!(pull_request = number, path = %path.display(), "wrote comment payload");
                    Ok(DeliveryStatus::Written(path.to_path_buf()))
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{json}")
                        .map_err(|e| DeltasError::Message(format!("failed to write stdout: {e}")))?;
                    Ok(DeliveryStatus::Printed)
                }
            }
        }
        Mode::Schedule { destination } | Mode::Push { destination } => {
            let stamp = generated_on(time::OffsetDateTime::now_utc())?;
            write_report_file(destination, &report.body, &stamp)?;
            info!(mode = mode.name(), path = %destination.display(), "wrote report file");
            Ok(DeliveryStatus::Written(destination.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TITLE;
    use crate::report::comment::marker;

    fn report() -> CommentReport {
        CommentReport {
            identity: "abc123".to_string(),
            body: format!("{}\n\nbody", marker(DEFAULT_TITLE, "abc123")),
            detail_omitted: false,
        }
    }

    #[test]
    fn test_generated_on_format() {
        let ts = time::OffsetDateTime::from_unix_timestamp(1_792_418_709).unwrap();
        assert_eq!(generated_on(ts).unwrap(), "Oct-19-2026 14:05:09");
    }

    #[test]
    fn test_deliver_pull_request_payload() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("comment.json");
        let r = report();
        let m = marker(DEFAULT_TITLE, &r.identity);

        let status = deliver(&Mode::PullRequest { number: 42 }, &r, &m, Some(&out), &[]).unwrap();
        assert_eq!(status, DeliveryStatus::Written(out.clone()));

        let payload: CommentPayload =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(payload.pull_request, 42);
        assert_eq!(payload.body, r.body);
    }

    #[test]
    fn test_deliver_skips_already_posted() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("comment.json");
        let r = report();
        let m = marker(DEFAULT_TITLE, &r.identity);
        let existing = vec![r.body.clone()];

        let status =
            deliver(&Mode::WorkflowRun { number: 1 }, &r, &m, Some(&out), &existing).unwrap();
        assert_eq!(status, DeliveryStatus::AlreadyPosted);
        assert!(!out.exists());
    }

    #[test]
    fn test_deliver_schedule_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("reports").join("size-deltas.md");
        let r = report();
        let m = marker(DEFAULT_TITLE, &r.identity);

        let mode = Mode::Schedule {
            destination: destination.clone(),
        };
        let status = deliver(&mode, &r, &m, None, &[]).unwrap();
        assert_eq!(status, DeliveryStatus::Written(destination.clone()));

        let content = std::fs::read_to_string(&destination).unwrap();
        assert!(content.starts_with(&r.body));
        assert!(content.contains("\nGenerated on: "));
    }

    #[test]
    fn test_load_existing_comments_both_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comments.json");
        std::fs::write(&path, r#"["plain body", {"id": 3, "body": "object body"}]"#).unwrap();

        let bodies = load_existing_comments(&path).unwrap();
        assert_eq!(bodies, vec!["plain body".to_string(), "object body".to_string()]);
    }
}
