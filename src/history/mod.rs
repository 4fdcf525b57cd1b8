//! Diff, changelog, merge and patch over pairs of snapshots.

mod aggregate;
mod changelog;
mod diff;
mod merge;
mod patch;
mod stats;
mod types;
mod word;

// Re-export public types
pub use aggregate::diff_snapshots;
pub use changelog::{generate_changelog, parse_tools};
pub use diff::{diff_lines, has_meaningful_changes};
pub use merge::{
    MergeSelection, copy_right_to_left, merge_key, merge_selected, reset_to_previous, split_key,
};
pub use patch::generate_patch;
pub use stats::{DiffStats, calculate_stats, file_stats};
pub use types::{
    DiffOptions, DiffResult, DiffRow, FileDiff, LastDiff, RowType, WordToken, WordTokenType,
};
pub use word::{diff_words, lcs_diff, reconstruct, tokenize};
