use super::diff::has_meaningful_changes;
use super::types::{DiffRow, FileDiff, RowType};
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_count: usize,
    pub removed_count: usize,
    /// False when the only changes are blank lines
    pub meaningful: bool,
}

/// Calculate character-level statistics from diff rows
pub fn calculate_stats(rows: &[DiffRow]) -> DiffStats {
    let mut stats = DiffStats {
        meaningful: has_meaningful_changes(rows),
        ..DiffStats::default()
    };

    for row in rows {
        match row.row_type {
            RowType::Same => {}
            RowType::Added => stats.added_count += row.right.chars().count(),
            RowType::Removed => stats.removed_count += row.left.chars().count(),
            RowType::Modified => {
                let diff = TextDiff::from_chars(row.left.as_str(), row.right.as_str());
                for change in diff.iter_all_changes() {
                    match change.tag() {
                        ChangeTag::Insert => stats.added_count += change.value().chars().count(),
                        ChangeTag::Delete => {
                            stats.removed_count += change.value().chars().count()
                        }
                        ChangeTag::Equal => {}
                    }
                }
            }
        }
    }

    stats
}

pub fn file_stats(file: &FileDiff) -> DiffStats {
    calculate_stats(&file.rows)
}
