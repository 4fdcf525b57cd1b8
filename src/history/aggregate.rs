use super::diff::diff_lines;
use super::types::{DiffOptions, DiffResult, FileDiff};
use crate::snapshot::Snapshot;

/// Diff every file of two snapshots.
///
/// Files are visited in the order of the left snapshot, followed by files only
/// the right one has. A file missing on one side compares against empty text.
pub fn diff_snapshots(left: &Snapshot, right: &Snapshot, options: &DiffOptions) -> DiffResult {
    let left_files = left.files();
    let right_files = right.files();

    let names = left_files
        .keys()
        .chain(right_files.keys().filter(|k| !left_files.contains_key(*k)));

    let full: Vec<FileDiff> = names
        .map(|name| {
            let l = left_files.get(name).map(String::as_str).unwrap_or("");
            let r = right_files.get(name).map(String::as_str).unwrap_or("");
            FileDiff::new(name.clone(), diff_lines(l, r, options))
        })
        .collect();

    let files = if options.only_changed {
        full.iter().filter(|f| f.changed).cloned().collect()
    } else {
        full.clone()
    };

    DiffResult { files, full }
}
