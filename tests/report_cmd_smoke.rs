use std::path::Path;

use report_size_deltas::config::{Mode, ReportConfig};
use report_size_deltas::publish::{CommentPayload, DeliveryStatus};
use report_size_deltas::report_cmd::{self, RenderConfig, ReportCmdConfig};
use serde_json::json;
use tempfile::tempdir;

fn write_reports(dir: &Path, flash: u64) {
    let doc = json!({
        "commit_hash": "0123abcd",
        "boards": [{
            "board": "arduino:samd:mkrzero",
            "target": "mkrzero",
            "sketches": [{
                "name": "examples/Blink",
                "sizes": [
                    {"flash_bytes": flash, "flash_percentage": 4.0},
                    {"ram_bytes": 2000, "ram_percentage": 6.1}
                ],
                "compilation_success": true
            }]
        }]
    });
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("sketches-report-1.json"), serde_json::to_vec(&doc).unwrap()).unwrap();
}

fn render_config(root: &Path) -> RenderConfig {
    write_reports(&root.join("current"), 10_600);
    write_reports(&root.join("baseline"), 10_000);
    RenderConfig {
        reports_dir: root.join("current"),
        baseline_dir: Some(root.join("baseline")),
        commit_hash: None,
        report: ReportConfig::default(),
    }
}

#[test]
fn report_cmd_pull_request_smoke() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("comment.json");
    let json_out = dir.path().join("deltas.json");
    let csv_out = dir.path().join("tables.csv");

    let config = ReportCmdConfig {
        render: render_config(dir.path()),
        mode: Mode::PullRequest { number: 17 },
        out: Some(out.clone()),
        existing_comments: None,
        json_out: Some(json_out.clone()),
        csv_out: Some(csv_out.clone()),
    };
    let status = report_cmd::run(config).unwrap();
    assert_eq!(status, Some(DeliveryStatus::Written(out.clone())));

    let payload: CommentPayload = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
    assert_eq!(payload.pull_request, 17);
    assert!(payload.body.starts_with("**Memory usage change @ 0123abcd**"));
    assert!(payload.body.contains("<td>⚠️+600</td>"));

    let deltas: serde_json::Value = serde_json::from_slice(&std::fs::read(&json_out).unwrap()).unwrap();
    assert_eq!(deltas["records"][0]["delta"]["flash"]["bytes"], 600);

    let csv = std::fs::read_to_string(&csv_out).unwrap();
    assert!(csv.lines().next().unwrap().starts_with("Memory,FLASH [bytes],FLASH [bytes]"));
}

#[test]
fn report_cmd_skips_already_posted_report() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("comment.json");
    let existing = dir.path().join("existing.json");
    std::fs::write(
        &existing,
        serde_json::to_vec(&json!([{"body": "**Memory usage change @ 0123abcd**\n\nold"}])).unwrap(),
    )
    .unwrap();

    let config = ReportCmdConfig {
        render: render_config(dir.path()),
        mode: Mode::WorkflowRun { number: 17 },
        out: Some(out.clone()),
        existing_comments: Some(existing),
        json_out: None,
        csv_out: None,
    };
    assert_eq!(report_cmd::run(config).unwrap(), Some(DeliveryStatus::AlreadyPosted));
    assert!(!out.exists());
}

#[test]
fn report_cmd_schedule_smoke() {
    let dir = tempdir().unwrap();
    let destination = dir.path().join("size-deltas").join("report.md");

    let config = ReportCmdConfig {
        render: render_config(dir.path()),
        mode: Mode::Schedule {
            destination: destination.clone(),
        },
        out: None,
        existing_comments: None,
        json_out: None,
        csv_out: None,
    };
    let status = report_cmd::run(config).unwrap();
    assert_eq!(status, Some(DeliveryStatus::Written(destination.clone())));

    let content = std::fs::read_to_string(&destination).unwrap();
    assert!(content.starts_with("**Memory usage change @ 0123abcd**"));
    assert!(content.contains("\nGenerated on: "));
    assert!(content.ends_with(" UTC\n"));
}

#[test]
fn report_cmd_no_data_delivers_nothing() {
    let dir = tempdir().unwrap();
    let reports = dir.path().join("current");
    std::fs::create_dir_all(&reports).unwrap();
    std::fs::write(reports.join("empty.json"), br#"{"boards": []}"#).unwrap();
    let destination = dir.path().join("report.md");

    let config = ReportCmdConfig {
        render: RenderConfig {
            reports_dir: reports,
            baseline_dir: None,
            commit_hash: None,
            report: ReportConfig::default(),
        },
        mode: Mode::Push {
            destination: destination.clone(),
        },
        out: None,
        existing_comments: None,
        json_out: None,
        csv_out: None,
    };
    assert_eq!(report_cmd::run(config).unwrap(), None);
    assert!(!destination.exists());
}
