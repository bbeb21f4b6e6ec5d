//! Core types and schemas for report-size-deltas.
//!
//! This module contains the on-disk sketches report schema and the in-memory
//! `BoardGroup` / `SketchSizeSample` model the rest of the pipeline works on.

pub mod schema;

// Re-export key types for convenience
pub use schema::{
    BoardGroup, CompilationSuccess, CompileStatus, FlashSize, RamSize, RawBoard, RawSketch,
    ShardReport, SketchSizeSample, Warnings,
};
