//! Storage layer for sketches reports.
//!
//! Reads shard directories and writes table exports.

pub mod csv;
pub mod shards;

// Re-export key types
pub use self::csv::CsvExporter;
pub use shards::{LoadedShards, ShardLoader, natural_cmp, read_shard};
