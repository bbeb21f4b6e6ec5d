//! Reporting module for size deltas.
//!
//! This module provides:
//! - `cells`: the threshold/emoji policy for delta cells
//! - `tables`: summary-by-board, compile-status and detail-by-sketch table models
//! - `html`: HTML serialization of those tables
//! - `comment`: the final comment body with its identity marker

pub mod cells;
pub mod comment;
pub mod html;
pub mod tables;

use serde::Serialize;

use crate::DeltasResult;
use crate::config::ReportConfig;
use crate::engine::DeltaReport;

// Re-export key types
pub use cells::{DeltaTier, format_bytes, format_percent, format_status_counts};
pub use comment::{CommentReport, assemble, marker, report_exists};
pub use html::{html_escape, render_table};
pub use tables::{HeaderCell, Table, detail_table, status_table, summary_table};

/// Result of a report run.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// No shard carried size data; nothing should be posted
    NoData,
    Rendered(Box<RenderedReport>),
}

impl ReportOutcome {
    pub fn rendered(&self) -> Option<&RenderedReport> {
        match self {
            ReportOutcome::NoData => None,
            ReportOutcome::Rendered(r) => Some(r.as_ref()),
        }
    }
}

/// Everything produced for one comparison.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedReport {
    pub deltas: DeltaReport,
    pub summary: Table,
    pub status: Table,
    pub detail: Table,
    pub comment: CommentReport,
}

/// Render the tables for a delta report and assemble the comment.
///
/// The compile-status table follows the size summary outside the collapsible
/// section. Without an `identity` the report is keyed on the SHA-256 of its
/// tables, so identical reports share a marker.
pub fn render(
    deltas: DeltaReport,
    identity: Option<&str>,
    config: &ReportConfig,
) -> DeltasResult<RenderedReport> {
    let summary = summary_table(&deltas);
    let status = status_table(&deltas);
    let detail = detail_table(&deltas, &config.strip_prefix);
    let summary_html = format!("{}\n{}", render_table(&summary), render_table(&status));
    let detail_html = render_table(&detail);

    let identity = match identity {
        Some(id) => id.to_string(),
        None => crate::sha256_hex(format!("{summary_html}{detail_html}").as_bytes()),
    };

    let comment = assemble(&identity, &summary_html, &detail_html, config)?;

    Ok(RenderedReport {
        deltas,
        summary,
        status,
        detail,
        comment,
    })
}
