//! Board consolidation across shards.

use std::collections::HashMap;

use crate::core::schema::BoardGroup;

/// Merge board fragments sharing a board id.
///
/// The first fragment for a board sets its target label; the samples of
/// every fragment are appended in order, duplicates included. Boards come
/// out in first-seen order.
pub fn consolidate(fragments: impl IntoIterator<Item = BoardGroup>) -> Vec<BoardGroup> {
    let mut boards: Vec<BoardGroup> = Vec::new();
    // board id -> position in `boards`
    let mut index: HashMap<String, usize> = HashMap::new();

    for fragment in fragments {
        match index.get(&fragment.board_id) {
            Some(&pos) => boards[pos].samples.extend(fragment.samples),
            None => {
                index.insert(fragment.board_id.clone(), boards.len());
                boards.push(fragment);
            }
        }
    }

    boards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{CompileStatus, SketchSizeSample};

    fn sample(name: &str) -> SketchSizeSample {
        SketchSizeSample {
            name: name.to_string(),
            flash_bytes: 1000,
            flash_percent: 3.0,
            ram_bytes: 100,
            ram_percent: 5.0,
            status: CompileStatus::Success,
            previous_status: None,
        }
    }

    fn fragment(board: &str, target: &str, names: &[&str]) -> BoardGroup {
        BoardGroup {
            board_id: board.to_string(),
            target: target.to_string(),
            samples: names.iter().map(|n| sample(n)).collect(),
        }
    }

    fn names(group: &BoardGroup) -> Vec<&str> {
        group.samples.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_consolidate_appends_in_shard_order() {
        let boards = consolidate(vec![
            fragment("uno", "uno", &["A", "B"]),
            fragment("uno", "uno", &["C"]),
        ]);

        assert_eq!(boards.len(), 1);
        assert_eq!(names(&boards[0]), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_consolidate_first_seen_board_order() {
        let boards = consolidate(vec![
            fragment("mega", "mega", &["A"]),
            fragment("uno", "uno", &["B"]),
            fragment("mega", "mega", &["C"]),
        ]);

        let ids: Vec<&str> = boards.iter().map(|b| b.board_id.as_str()).collect();
        assert_eq!(ids, vec!["mega", "uno"]);
        assert_eq!(names(&boards[0]), vec!["A", "C"]);
        assert_eq!(names(&boards[1]), vec!["B"]);
    }

    #[test]
    fn test_consolidate_first_target_label_wins() {
        let boards = consolidate(vec![
            fragment("arduino:avr:uno", "uno", &["A"]),
            fragment("arduino:avr:uno", "uno-r3", &["B"]),
        ]);

        assert_eq!(boards[0].target, "uno");
    }

    #[test]
    fn test_consolidate_keeps_duplicates() {
        let boards = consolidate(vec![
            fragment("uno", "uno", &["A"]),
            fragment("uno", "uno", &["A"]),
        ]);

        assert_eq!(names(&boards[0]), vec!["A", "A"]);
    }

    #[test]
    fn test_consolidate_empty() {
        assert!(consolidate(Vec::new()).is_empty());
    }
}
