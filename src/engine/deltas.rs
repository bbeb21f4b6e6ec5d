//! Size deltas between a current build and its baseline.
//!
//! Each current sample is matched to the baseline board with the same target
//! label and, within it, the first sample with the same name. Byte deltas are
//! `current - baseline`; percent deltas are derived from the byte counts as
//! `(current / baseline) * 100 - 100` and never read from the report's own
//! percentage fields.
//!
//! Sizes from a build that failed to compile are not measurements: a failed
//! current sample gets no delta, and a failed baseline sample counts as no
//! baseline.

use serde::Serialize;

use crate::core::schema::{BoardGroup, CompileStatus, SketchSizeSample};

/// Delta of one memory kind (flash or RAM).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemoryDelta {
    pub bytes: i64,
    /// `None` when the baseline byte count is zero
    pub percent: Option<f64>,
}

impl MemoryDelta {
    pub fn between(current: u64, baseline: u64) -> Self {
        let bytes = to_i64(current).saturating_sub(to_i64(baseline));
        let percent = if baseline == 0 {
            None
        } else {
            Some((current as f64 / baseline as f64) * 100.0 - 100.0)
        };
        MemoryDelta { bytes, percent }
    }
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SketchDelta {
    pub flash: MemoryDelta,
    pub ram: MemoryDelta,
}

impl SketchDelta {
    pub fn between(current: &SketchSizeSample, baseline: &SketchSizeSample) -> Self {
        SketchDelta {
            flash: MemoryDelta::between(current.flash_bytes, baseline.flash_bytes),
            ram: MemoryDelta::between(current.ram_bytes, baseline.ram_bytes),
        }
    }
}

/// Delta for one (board, sketch) occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaRecord {
    pub board_id: String,
    pub target: String,
    pub sketch_name: String,
    pub status: CompileStatus,
    pub previous_status: Option<CompileStatus>,
    /// `None` when the sketch failed to compile or no baseline sample matched
    pub delta: Option<SketchDelta>,
}

impl DeltaRecord {
    pub fn has_baseline(&self) -> bool {
        self.delta.is_some()
    }

    /// The current build of the sketch failed to compile.
    pub fn failed(&self) -> bool {
        self.status == CompileStatus::Error
    }
}

/// Number of sketches per compile status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub success: usize,
    pub warning: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: CompileStatus) {
        match status {
            CompileStatus::Success => self.success += 1,
            CompileStatus::Warning => self.warning += 1,
            CompileStatus::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.warning + self.error
    }
}

/// Running minimum and maximum, seeded at zero.
///
/// A board whose sketches all shrank still reports `max == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> MinMax<T> {
    pub fn update(&mut self, value: T) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

/// Per-board aggregate of every matched delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSummary {
    pub board_id: String,
    pub target: String,
    pub flash_bytes: MinMax<i64>,
    pub flash_percent: MinMax<f64>,
    pub ram_bytes: MinMax<i64>,
    pub ram_percent: MinMax<f64>,
    /// Compile status of every current sample
    pub compile: StatusCounts,
    /// Compile status of the previous build, for samples that report one
    pub previous_compile: StatusCounts,
}

impl BoardSummary {
    pub fn new(board: &BoardGroup) -> Self {
        BoardSummary {
            board_id: board.board_id.clone(),
            target: board.target.clone(),
            flash_bytes: MinMax::default(),
            flash_percent: MinMax::default(),
            ram_bytes: MinMax::default(),
            ram_percent: MinMax::default(),
            compile: StatusCounts::default(),
            previous_compile: StatusCounts::default(),
        }
    }

    fn fold(&mut self, delta: &SketchDelta) {
        self.flash_bytes.update(delta.flash.bytes);
        self.ram_bytes.update(delta.ram.bytes);
        if let Some(pct) = delta.flash.percent {
            self.flash_percent.update(pct);
        }
        if let Some(pct) = delta.ram.percent {
            self.ram_percent.update(pct);
        }
    }
}

/// Everything the renderer needs: per-sample records and per-board summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaReport {
    /// Current boards, in consolidated order
    pub boards: Vec<BoardGroup>,
    /// One record per current sample occurrence, board by board
    pub records: Vec<DeltaRecord>,
    /// One summary per current board, same order as `boards`
    pub summaries: Vec<BoardSummary>,
}

impl DeltaReport {
    /// Number of samples that found no baseline counterpart.
    pub fn missing_baselines(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.failed() && !r.has_baseline())
            .count()
    }

    /// Number of samples whose current build failed to compile.
    pub fn failed_compilations(&self) -> usize {
        self.records.iter().filter(|r| r.failed()).count()
    }
}

/// Compute deltas for consolidated current boards against an optional baseline.
///
/// Samples without a baseline match, and samples that failed to compile,
/// produce a record without a delta and are left out of the board's min/max
/// fold. Every sample counts towards the board's compile status.
pub fn compute_deltas(current: &[BoardGroup], baseline: Option<&[BoardGroup]>) -> DeltaReport {
    let mut records = Vec::new();
    let mut summaries = Vec::with_capacity(current.len());

    for board in current {
        let baseline_board =
            baseline.and_then(|groups| groups.iter().find(|b| b.target == board.target));
        let mut summary = BoardSummary::new(board);

        for sample in &board.samples {
            summary.compile.record(sample.status);
            if let Some(previous) = sample.previous_status {
                summary.previous_compile.record(previous);
            }

            let delta = baseline_board
                .filter(|_| sample.compiled())
                .and_then(|b| b.find_sample(&sample.name))
                .filter(|base| base.compiled())
                .map(|base| SketchDelta::between(sample, base));

            if let Some(d) = &delta {
                summary.fold(d);
            }

            records.push(DeltaRecord {
                board_id: board.board_id.clone(),
                target: board.target.clone(),
                sketch_name: sample.name.clone(),
                status: sample.status,
                previous_status: sample.previous_status,
                delta,
            });
        }

        summaries.push(summary);
    }

    DeltaReport {
        boards: current.to_vec(),
        records,
        summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, flash: u64, ram: u64) -> SketchSizeSample {
        SketchSizeSample {
            name: name.to_string(),
            flash_bytes: flash,
            flash_percent: 0.0,
            ram_bytes: ram,
            ram_percent: 0.0,
            status: CompileStatus::Success,
            previous_status: None,
        }
    }

    fn board(id: &str, target: &str, samples: Vec<SketchSizeSample>) -> BoardGroup {
        BoardGroup {
            board_id: id.to_string(),
            target: target.to_string(),
            samples,
        }
    }

    #[test]
    fn test_memory_delta_bytes_and_percent() {
        let d = MemoryDelta::between(2100, 2000);
        assert_eq!(d.bytes, 100);
        assert_eq!(d.percent, Some((2100.0 / 2000.0) * 100.0 - 100.0));
        assert!((d.percent.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_memory_delta_shrink() {
        let d = MemoryDelta::between(1500, 2000);
        assert_eq!(d.bytes, -500);
        assert!((d.percent.unwrap() - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn test_memory_delta_zero_baseline_has_no_percent() {
        let d = MemoryDelta::between(100, 0);
        assert_eq!(d.bytes, 100);
        assert_eq!(d.percent, None);
    }

    #[test]
    fn test_min_max_seeded_at_zero() {
        let mut mm = MinMax::<i64>::default();
        for v in [-10, -3000, -1] {
            mm.update(v);
        }
        assert_eq!(mm.min, -3000);
        assert_eq!(mm.max, 0);
    }

    #[test]
    fn test_compute_deltas_summary_fold() {
        let current = vec![board(
            "uno",
            "uno",
            vec![sample("a", 1050, 100), sample("b", 0, 100), sample("c", 1000, 100)],
        )];
        let baseline = vec![board(
            "uno",
            "uno",
            vec![sample("a", 1000, 100), sample("b", 3000, 100), sample("c", 1000, 100)],
        )];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        let s = &report.summaries[0];
        assert_eq!(s.flash_bytes.min, -3000);
        assert_eq!(s.flash_bytes.max, 50);
        assert_eq!(s.ram_bytes.min, 0);
        assert_eq!(s.ram_bytes.max, 0);
        assert!((s.flash_percent.min - (-100.0)).abs() < 1e-9);
        assert!((s.flash_percent.max - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_deltas_all_negative_keeps_max_zero() {
        let current = vec![board("uno", "uno", vec![sample("a", 900, 90)])];
        let baseline = vec![board("uno", "uno", vec![sample("a", 1000, 100)])];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        let s = &report.summaries[0];
        assert_eq!(s.flash_bytes.max, 0);
        assert_eq!(s.flash_bytes.min, -100);
        assert_eq!(s.flash_percent.max, 0.0);
        assert_eq!(s.ram_bytes.min, -10);
    }

    #[test]
    fn test_compute_deltas_no_baseline_sample_excluded_from_summary() {
        let current = vec![board(
            "uno",
            "uno",
            vec![sample("a", 1010, 100), sample("new", 90_000, 9_000)],
        )];
        let baseline = vec![board("uno", "uno", vec![sample("a", 1000, 100)])];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        assert!(report.records[0].has_baseline());
        assert!(!report.records[1].has_baseline());
        assert_eq!(report.missing_baselines(), 1);

        let s = &report.summaries[0];
        assert_eq!(s.flash_bytes.max, 10);
        assert_eq!(s.ram_bytes.max, 0);
    }

    #[test]
    fn test_compute_deltas_without_baseline() {
        let current = vec![board("uno", "uno", vec![sample("a", 1000, 100)])];
        let report = compute_deltas(&current, None);

        assert_eq!(report.records.len(), 1);
        assert!(report.records[0].delta.is_none());
        assert_eq!(report.summaries[0].flash_bytes, MinMax { min: 0, max: 0 });
    }

    #[test]
    fn test_compute_deltas_matches_baseline_by_target_label() {
        let current = vec![board("arduino:avr:uno", "uno", vec![sample("a", 1100, 100)])];
        let baseline = vec![
            board("arduino:avr:mega", "mega", vec![sample("a", 5000, 100)]),
            board("other:uno", "uno", vec![sample("a", 1000, 100)]),
        ];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        assert_eq!(report.records[0].delta.unwrap().flash.bytes, 100);
    }

    #[test]
    fn test_compute_deltas_first_baseline_duplicate_wins() {
        let current = vec![board("uno", "uno", vec![sample("a", 1000, 100)])];
        let baseline = vec![board(
            "uno",
            "uno",
            vec![sample("a", 900, 100), sample("a", 100, 100)],
        )];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        assert_eq!(report.records[0].delta.unwrap().flash.bytes, 100);
    }

    #[test]
    fn test_compute_deltas_duplicate_current_samples_each_processed() {
        let current = vec![board(
            "uno",
            "uno",
            vec![sample("a", 1100, 100), sample("a", 800, 100)],
        )];
        let baseline = vec![board("uno", "uno", vec![sample("a", 1000, 100)])];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        assert_eq!(report.records.len(), 2);
        let s = &report.summaries[0];
        assert_eq!(s.flash_bytes.min, -200);
        assert_eq!(s.flash_bytes.max, 100);
    }

    #[test]
    fn test_compute_deltas_zero_baseline_skips_percent_fold() {
        let current = vec![board("uno", "uno", vec![sample("a", 500, 100)])];
        let baseline = vec![board("uno", "uno", vec![sample("a", 0, 100)])];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        let s = &report.summaries[0];
        assert_eq!(s.flash_bytes.max, 500);
        assert_eq!(s.flash_percent.max, 0.0);
        assert_eq!(report.records[0].delta.unwrap().flash.percent, None);
    }

    #[test]
    fn test_compute_deltas_failed_current_excluded_from_summary() {
        let mut broken = sample("broken", 0, 0);
        broken.status = CompileStatus::Error;
        broken.previous_status = Some(CompileStatus::Success);
        let current = vec![board("uno", "uno", vec![sample("a", 1010, 100), broken])];
        let baseline = vec![board(
            "uno",
            "uno",
            vec![sample("a", 1000, 100), sample("broken", 30_000, 100)],
        )];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        assert!(report.records[1].failed());
        assert!(report.records[1].delta.is_none());
        assert_eq!(report.failed_compilations(), 1);
        assert_eq!(report.missing_baselines(), 0);

        let s = &report.summaries[0];
        assert_eq!(s.flash_bytes, MinMax { min: 0, max: 10 });
        assert_eq!(s.ram_bytes, MinMax { min: 0, max: 0 });
        assert_eq!(s.compile, StatusCounts { success: 1, warning: 0, error: 1 });
        assert_eq!(s.previous_compile, StatusCounts { success: 1, warning: 0, error: 0 });
    }

    #[test]
    fn test_compute_deltas_failed_baseline_is_no_baseline() {
        let current = vec![board("uno", "uno", vec![sample("a", 1000, 100)])];
        let mut broken = sample("a", 0, 0);
        broken.status = CompileStatus::Error;
        let baseline = vec![board("uno", "uno", vec![broken])];

        let report = compute_deltas(&current, Some(baseline.as_slice()));
        assert!(!report.records[0].has_baseline());
        assert_eq!(report.missing_baselines(), 1);
        assert_eq!(report.summaries[0].flash_bytes.max, 0);
    }
}
