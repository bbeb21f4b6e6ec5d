//! Shard loading for sketches report directories.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::schema::{BoardGroup, ShardReport};
use crate::{DeltasError, DeltasResult};

/// Board fragments read from one directory of shard documents.
#[derive(Debug, Clone, Default)]
pub struct LoadedShards {
    /// One fragment per board entry, in shard order then document order
    pub groups: Vec<BoardGroup>,
    /// `commit_hash` of the first shard that carried one
    pub commit_hash: Option<String>,
    /// Number of documents that contributed board data
    pub shard_count: usize,
}

impl LoadedShards {
    /// True when no shard contributed any board data.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Reader for a directory of per-shard sketches reports.
#[derive(Debug, Clone)]
pub struct ShardLoader {
    dir: PathBuf,
}

impl ShardLoader {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        ShardLoader {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// List the shard files in natural filename order.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    pub fn shard_paths(&self) -> DeltasResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            DeltasError::Message(format!(
                "failed to read reports directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                DeltasError::Message(format!("failed to read directory entry: {e}"))
            })?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }

        paths.sort_by(|a, b| natural_cmp(&file_name_of(a), &file_name_of(b)));
        Ok(paths)
    }

    /// Read every shard and flatten its boards into `BoardGroup` fragments.
    ///
    /// An empty directory, or one whose documents carry no board data, yields
    /// an empty result rather than an error.
    ///
    /// # Errors
    /// Returns `MalformedInput` for the first document that is not valid JSON
    /// or does not match the report schema.
    pub fn load(&self) -> DeltasResult<LoadedShards> {
        let mut loaded = LoadedShards::default();

        for path in self.shard_paths()? {
            debug!(path = %path.display(), "reading sketches report");
            let report = read_shard(&path)?;

            if report.boards.is_empty() {
                debug!(path = %path.display(), "report has no board data, skipping");
                continue;
            }

            if loaded.commit_hash.is_none() {
                loaded.commit_hash = report.commit_hash.clone();
            }
            loaded.shard_count += 1;

            for board in report.boards {
                let group = BoardGroup::from(board);
                for sample in group.samples.iter().filter(|s| !s.compiled()) {
                    warn!(board = %group.board_id, sketch = %sample.name, "sketch failed to compile");
                }
                loaded.groups.push(group);
            }
        }

        if loaded.is_empty() {
            info!(dir = %self.dir.display(), "no size deltas data found in sketches reports");
        } else {
            info!(
                dir = %self.dir.display(),
                shards = loaded.shard_count,
                boards = loaded.groups.len(),
                "loaded sketches reports"
            );
        }

        Ok(loaded)
    }
}

/// Parse a single shard document.
pub fn read_shard(path: &Path) -> DeltasResult<ShardReport> {
    let bytes = std::fs::read(path).map_err(|e| {
        DeltasError::Message(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_slice(&bytes).map_err(|e| DeltasError::MalformedInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compare two names treating runs of ASCII digits as integers.
///
/// `report2.json` sorts before `report10.json`. Names that only differ in
/// leading zeros fall back to plain lexical order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs::new(a);
    let mut right = Runs::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l, r) {
                    (Run::Digits(x), Run::Digits(y)) => cmp_digits(x, y),
                    (Run::Text(x), Run::Text(y)) => x.cmp(y),
                    // digits sort before text, as '0'..'9' precede letters
                    (Run::Digits(_), Run::Text(_)) => Ordering::Less,
                    (Run::Text(_), Run::Digits(_)) => Ordering::Greater,
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Compare two digit strings by numeric value without overflowing.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Text(&'a str),
    Digits(&'a str),
}

struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Runs<'a> {
    fn new(s: &'a str) -> Self {
        Runs { rest: s }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits { Run::Digits(run) } else { Run::Text(run) })
    }
}
