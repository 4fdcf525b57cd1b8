use super::types::{DiffResult, LastDiff};
use crate::form::FormData;
use crate::snapshot::Snapshot;
use std::collections::BTreeSet;

/// `"<file>:<line index>"`
pub fn merge_key(file: &str, index: usize) -> String {
    format!("{}:{}", file, index)
}

/// Split a merge key back into file and line index
pub fn split_key(key: &str) -> Option<(&str, usize)> {
    let (file, index) = key.rsplit_once(':')?;
    Some((file, index.parse().ok()?))
}

/// Lines the user picked to pull from the right snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSelection {
    keys: BTreeSet<String>,
}

impl MergeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the selection of one row.
    ///
    /// Returns the new state, or `None` when the row does not exist or is not
    /// selectable (only added and modified rows have a right side to take).
    pub fn toggle(&mut self, diff: &DiffResult, file: &str, index: usize) -> Option<bool> {
        let row = diff.file(file)?.row(index)?;
        if !row.row_type.is_selectable() {
            return None;
        }

        let key = merge_key(file, index);
        if self.keys.remove(&key) {
            Some(false)
        } else {
            self.keys.insert(key);
            Some(true)
        }
    }

    pub fn contains(&self, file: &str, index: usize) -> bool {
        self.keys.contains(&merge_key(file, index))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Whether any selected line belongs to a changed file
    fn touches_changed_file(&self, diff: &DiffResult) -> bool {
        self.keys()
            .filter_map(split_key)
            .any(|(file, _)| diff.is_changed(file))
    }
}

/// Merge the selection into the left snapshot's form data.
///
/// Selection is per line but applied per field: once any selected line sits in
/// a changed file, every field of the right snapshot replaces the left value.
pub fn merge_selected(last: &LastDiff, selection: &MergeSelection) -> FormData {
    let mut merged = last.left.form_data().clone();

    if selection.touches_changed_file(&last.result) {
        for (key, value) in last.right.form_data() {
            merged.insert(key.clone(), value.clone());
        }
    }

    merged
}

/// Take the right snapshot's form data wholesale
pub fn copy_right_to_left(right: &Snapshot) -> FormData {
    right.form_data().clone()
}

/// Form data of the second newest history entry
pub fn reset_to_previous(history: &[Snapshot]) -> Option<FormData> {
    history.get(1).map(|s| s.form_data().clone())
}
