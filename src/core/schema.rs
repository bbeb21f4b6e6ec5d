//! Sketches report schema - one document per compilation shard.

use serde::{Deserialize, Serialize};

/// A single shard document as produced by the compilation matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShardReport {
    /// Head commit the shard was compiled from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_url: Option<String>,

    pub boards: Vec<RawBoard>,
}

/// One board entry of a shard document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBoard {
    /// Opaque grouping key (usually the FQBN)
    pub board: String,
    /// Display label for the hardware target
    pub target: String,
    pub sketches: Vec<RawSketch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSketch {
    pub name: String,
    /// Exactly two entries: flash first, RAM second
    pub sizes: (FlashSize, RamSize),
    pub compilation_success: CompilationSuccess,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Warnings>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlashSize {
    pub flash_bytes: u64,
    pub flash_percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RamSize {
    pub ram_bytes: u64,
    pub ram_percentage: f64,
}

/// Compilation outcome, either a bare flag or the current/previous form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompilationSuccess {
    Flag(bool),
    Detailed {
        current: AbsoluteFlag,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<AbsoluteFlag>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbsoluteFlag {
    pub absolute: bool,
}

impl CompilationSuccess {
    /// Whether the current build of the sketch compiled.
    pub fn current(&self) -> bool {
        match self {
            CompilationSuccess::Flag(ok) => *ok,
            CompilationSuccess::Detailed { current, .. } => current.absolute,
        }
    }

    /// Whether the previous build compiled, when the report carries it.
    pub fn previous(&self) -> Option<bool> {
        match self {
            CompilationSuccess::Flag(_) => None,
            CompilationSuccess::Detailed { previous, .. } => previous.map(|p| p.absolute),
        }
    }
}

/// Compiler warning count, either a bare number or the current/previous form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Warnings {
    Count(u64),
    Detailed {
        current: AbsoluteCount,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<AbsoluteCount>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbsoluteCount {
    pub absolute: u64,
}

impl Warnings {
    pub fn current(&self) -> u64 {
        match self {
            Warnings::Count(n) => *n,
            Warnings::Detailed { current, .. } => current.absolute,
        }
    }

    pub fn previous(&self) -> Option<u64> {
        match self {
            Warnings::Count(_) => None,
            Warnings::Detailed { previous, .. } => previous.map(|p| p.absolute),
        }
    }
}

/// Build outcome of one sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileStatus {
    Success,
    /// Compiled, with at least one compiler warning
    Warning,
    Error,
}

impl CompileStatus {
    pub fn classify(compiled: bool, warnings: u64) -> Self {
        if !compiled {
            CompileStatus::Error
        } else if warnings > 0 {
            CompileStatus::Warning
        } else {
            CompileStatus::Success
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            CompileStatus::Success => "✅",
            CompileStatus::Warning => "⚠️",
            CompileStatus::Error => "❌",
        }
    }
}

/// One compiled sketch's measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchSizeSample {
    pub name: String,
    pub flash_bytes: u64,
    pub flash_percent: f64,
    pub ram_bytes: u64,
    pub ram_percent: f64,
    pub status: CompileStatus,
    /// Outcome of the previous build, present with the current/previous form
    pub previous_status: Option<CompileStatus>,
}

impl SketchSizeSample {
    /// Whether the sizes come from a successful build.
    pub fn compiled(&self) -> bool {
        self.status != CompileStatus::Error
    }
}

impl From<RawSketch> for SketchSizeSample {
    fn from(raw: RawSketch) -> Self {
        let (flash, ram) = raw.sizes;
        let warnings = raw.warnings.as_ref().map(Warnings::current).unwrap_or(0);
        let previous_warnings = raw.warnings.as_ref().and_then(Warnings::previous).unwrap_or(0);
        SketchSizeSample {
            name: raw.name,
            flash_bytes: flash.flash_bytes,
            flash_percent: flash.flash_percentage,
            ram_bytes: ram.ram_bytes,
            ram_percent: ram.ram_percentage,
            status: CompileStatus::classify(raw.compilation_success.current(), warnings),
            previous_status: raw
                .compilation_success
                .previous()
                .map(|ok| CompileStatus::classify(ok, previous_warnings)),
        }
    }
}

/// Size data for one hardware target.
///
/// Sample names are not unique: the same sketch may show up in several
/// shards and every occurrence is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardGroup {
    pub board_id: String,
    pub target: String,
    pub samples: Vec<SketchSizeSample>,
}

impl BoardGroup {
    pub fn new(board_id: impl Into<String>, target: impl Into<String>) -> Self {
        BoardGroup {
            board_id: board_id.into(),
            target: target.into(),
            samples: Vec::new(),
        }
    }

    /// First sample with the given sketch name.
    pub fn find_sample(&self, name: &str) -> Option<&SketchSizeSample> {
        self.samples.iter().find(|s| s.name == name)
    }
}

impl From<RawBoard> for BoardGroup {
    fn from(raw: RawBoard) -> Self {
        BoardGroup {
            board_id: raw.board,
            target: raw.target,
            samples: raw.sketches.into_iter().map(SketchSizeSample::from).collect(),
        }
    }
}
