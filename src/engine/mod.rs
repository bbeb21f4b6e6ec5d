//! Engine module: turns loaded shard fragments into size deltas.
//!
//! # Pipeline
//!
//! - **Consolidation** (`consolidate`): merges the fragments of every shard into
//!   one `BoardGroup` per board id, keeping first-seen order.
//! - **Deltas** (`deltas`): matches each current sample against the baseline
//!   build and folds the per-board min/max summaries.
//!
//! Both steps are pure: output order depends only on input order.

pub mod consolidate;
pub mod deltas;

// Re-export key types for convenience
pub use consolidate::consolidate;
pub use deltas::{
    BoardSummary, DeltaRecord, DeltaReport, MemoryDelta, MinMax, SketchDelta, StatusCounts,
    compute_deltas,
};
