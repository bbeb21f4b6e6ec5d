//! Cell formatting policy for size delta tables.
//!
//! Byte cells:
//! - no baseline: `-`
//! - zero: `0`
//! - `0 < v < 2048`: `⚠️+v`
//! - `v >= 2048`: `‼️+nK`
//! - `-2048 < v < 0`: `💚v`
//! - `v <= -2048`: `💚-nK`
//!
//! where `n` is `v / 1024` rounded half to even. Percent cells share the emoji
//! tiers (`> 0` warning, `> 1` alert, `< 0` decrease) and always carry two
//! decimal places.
//!
//! A sketch whose current build failed shows `❌` instead of a size.

use crate::core::schema::CompileStatus;
use crate::engine::StatusCounts;

/// Byte deltas at or beyond this magnitude are shown in kibibytes.
pub const COMPACT_THRESHOLD_BYTES: i64 = 2048;

/// Percent deltas above this are shown with the alert emoji.
pub const ALERT_THRESHOLD_PERCENT: f64 = 1.0;

/// Placeholder for a cell with no baseline to compare against.
pub const NO_BASELINE: &str = "-";

/// Visual tier of a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaTier {
    Unchanged,
    Increase,
    LargeIncrease,
    Decrease,
}

impl DeltaTier {
    pub fn emoji(&self) -> &'static str {
        match self {
            DeltaTier::Unchanged => "",
            DeltaTier::Increase => "⚠️",
            DeltaTier::LargeIncrease => "‼️",
            DeltaTier::Decrease => "💚",
        }
    }

    /// Prefix placed before the number: increases carry an explicit `+`.
    pub fn prefix(&self) -> String {
        match self {
            DeltaTier::Increase | DeltaTier::LargeIncrease => format!("{}+", self.emoji()),
            _ => self.emoji().to_string(),
        }
    }

    pub fn for_bytes(v: i64) -> Self {
        if v >= COMPACT_THRESHOLD_BYTES {
            DeltaTier::LargeIncrease
        } else if v > 0 {
            DeltaTier::Increase
        } else if v < 0 {
            DeltaTier::Decrease
        } else {
            DeltaTier::Unchanged
        }
    }

    pub fn for_percent(v: f64) -> Self {
        if v > ALERT_THRESHOLD_PERCENT {
            DeltaTier::LargeIncrease
        } else if v > 0.0 {
            DeltaTier::Increase
        } else if v < 0.0 {
            DeltaTier::Decrease
        } else {
            DeltaTier::Unchanged
        }
    }
}

/// Round `bytes / 1024` half to even.
pub fn kibibytes(bytes: i64) -> i64 {
    (bytes as f64 / 1024.0).round_ties_even() as i64
}

/// Format a byte delta cell.
pub fn format_bytes(delta: Option<i64>) -> String {
    let Some(v) = delta else {
        return NO_BASELINE.to_string();
    };

    if v == 0 {
        return "0".to_string();
    }

    let tier = DeltaTier::for_bytes(v);
    // the negative side compacts at -2048 inclusive but keeps raw bytes above it
    if v >= COMPACT_THRESHOLD_BYTES || v <= -COMPACT_THRESHOLD_BYTES {
        format!("{}{}K", tier.prefix(), kibibytes(v))
    } else {
        format!("{}{}", tier.prefix(), v)
    }
}

/// Cell for a sketch whose current build failed to compile.
pub fn failed_build() -> &'static str {
    CompileStatus::Error.emoji()
}

/// Format compile status counts, e.g. `2 ✅ 1 ❌`.
///
/// When the previous build's counts are known they come first:
/// `3 ✅ -> 2 ✅ 1 ❌`. A board without any sketches shows `N/A`.
pub fn format_status_counts(current: &StatusCounts, previous: &StatusCounts) -> String {
    let current = status_parts(current);
    if current.is_empty() {
        return "N/A".to_string();
    }
    let previous = status_parts(previous);
    if previous.is_empty() {
        current
    } else {
        format!("{previous} -> {current}")
    }
}

fn status_parts(counts: &StatusCounts) -> String {
    [
        (counts.success, CompileStatus::Success),
        (counts.warning, CompileStatus::Warning),
        (counts.error, CompileStatus::Error),
    ]
    .iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, status)| format!("{n} {}", status.emoji()))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Format a percent delta cell.
pub fn format_percent(delta: Option<f64>) -> String {
    match delta {
        None => NO_BASELINE.to_string(),
        Some(v) if v == 0.0 => "0.00".to_string(),
        Some(v) => format!("{}{:.2}", DeltaTier::for_percent(v).prefix(), v),
    }
}
