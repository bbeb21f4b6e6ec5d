pub mod config;
pub mod core;
pub mod engine;
pub mod publish;
pub mod report;
pub mod report_cmd;
pub mod storage;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeltasError {
    /// A shard document could not be parsed or did not match the report schema.
    #[error("malformed sketches report {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },
    #[error("report body is {length} characters, over the {limit} character limit")]
    ReportTooLarge { length: usize, limit: usize },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
}

pub type DeltasResult<T> = Result<T, DeltasError>;

pub use crate::config::{Mode, ReportConfig};
pub use crate::core::schema::{BoardGroup, SketchSizeSample};
pub use crate::engine::{BoardSummary, DeltaRecord, DeltaReport, MemoryDelta, SketchDelta};
pub use crate::report::{CommentReport, ReportOutcome};

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha256::digest;
    digest(bytes)
}
