//! Summary and detail table models.

use std::collections::HashMap;

use serde::Serialize;

use crate::engine::DeltaReport;
use crate::report::cells::{
    NO_BASELINE, failed_build, format_bytes, format_percent, format_status_counts,
};

/// A header cell spanning one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub text: String,
    pub span: usize,
}

impl HeaderCell {
    pub fn single(text: impl Into<String>) -> Self {
        HeaderCell {
            text: text.into(),
            span: 1,
        }
    }

    pub fn spanning(text: impl Into<String>, span: usize) -> Self {
        HeaderCell {
            text: text.into(),
            span,
        }
    }
}

/// A rendered table: header rows with spans, then plain text rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<Vec<HeaderCell>>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Width of the table, taken from its first header row.
    pub fn column_count(&self) -> usize {
        self.header
            .first()
            .map(|row| row.iter().map(|c| c.span).sum())
            .unwrap_or(0)
    }
}

const SUMMARY_METRICS: [&str; 4] = ["FLASH [bytes]", "FLASH [%]", "RAM [bytes]", "RAM [%]"];

/// Per-board min/max of every metric.
pub fn summary_table(report: &DeltaReport) -> Table {
    let mut top = vec![HeaderCell::single("Memory")];
    top.extend(SUMMARY_METRICS.iter().map(|m| HeaderCell::spanning(*m, 2)));

    let mut sub = vec![HeaderCell::single("Target")];
    for _ in SUMMARY_METRICS {
        sub.push(HeaderCell::single("Min"));
        sub.push(HeaderCell::single("Max"));
    }

    let rows = report
        .summaries
        .iter()
        .map(|s| {
            vec![
                s.target.to_uppercase(),
                format_bytes(Some(s.flash_bytes.min)),
                format_bytes(Some(s.flash_bytes.max)),
                format_percent(Some(s.flash_percent.min)),
                format_percent(Some(s.flash_percent.max)),
                format_bytes(Some(s.ram_bytes.min)),
                format_bytes(Some(s.ram_bytes.max)),
                format_percent(Some(s.ram_percent.min)),
                format_percent(Some(s.ram_percent.max)),
            ]
        })
        .collect();

    Table {
        header: vec![top, sub],
        rows,
    }
}

/// Sketch name as shown in the detail table.
pub fn display_name<'a>(name: &'a str, strip_prefix: &str) -> &'a str {
    if strip_prefix.is_empty() {
        return name;
    }
    name.strip_prefix(strip_prefix).unwrap_or(name)
}

/// Per-board compile status counts, previous build first when known.
pub fn status_table(report: &DeltaReport) -> Table {
    let rows = report
        .summaries
        .iter()
        .map(|s| {
            vec![
                s.target.to_uppercase(),
                format_status_counts(&s.compile, &s.previous_compile),
            ]
        })
        .collect();

    Table {
        header: vec![vec![HeaderCell::single("Target"), HeaderCell::single("Compilation")]],
        rows,
    }
}

/// Per-sketch flash and RAM byte deltas, two columns per board.
///
/// Rows follow the first appearance of each sketch name across boards. A
/// board that lacks a sketch shows `-`, a failed build shows `❌`; when a board lists a sketch more than
/// once, the last occurrence fills its cells.
pub fn detail_table(report: &DeltaReport, strip_prefix: &str) -> Table {
    let mut top = vec![HeaderCell::single("Target")];
    let mut sub = vec![HeaderCell::single("Example")];
    let mut columns: HashMap<&str, usize> = HashMap::new();
    for (i, board) in report.boards.iter().enumerate() {
        top.push(HeaderCell::spanning(board.target.to_uppercase(), 2));
        sub.push(HeaderCell::single("FLASH"));
        sub.push(HeaderCell::single("RAM"));
        columns.entry(board.board_id.as_str()).or_insert(i);
    }
    let width = 1 + 2 * report.boards.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row_index: HashMap<&str, usize> = HashMap::new();

    for record in &report.records {
        let Some(&col) = columns.get(record.board_id.as_str()) else {
            continue;
        };

        let row = *row_index.entry(record.sketch_name.as_str()).or_insert_with(|| {
            let mut cells = vec![NO_BASELINE.to_string(); width];
            cells[0] = display_name(&record.sketch_name, strip_prefix).to_string();
            rows.push(cells);
            rows.len() - 1
        });

        let (flash, ram) = match &record.delta {
            _ if record.failed() => (failed_build().to_string(), failed_build().to_string()),
            Some(d) => (format_bytes(Some(d.flash.bytes)), format_bytes(Some(d.ram.bytes))),
            None => (format_bytes(None), format_bytes(None)),
        };
        rows[row][1 + 2 * col] = flash;
        rows[row][2 + 2 * col] = ram;
    }

    Table {
        header: vec![top, sub],
        rows,
    }
}
