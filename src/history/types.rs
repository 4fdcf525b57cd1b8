use crate::snapshot::Snapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Same,
    Added,
    Removed,
    Modified,
}

impl RowType {
    /// Rows that have something on the right to pull into a merge
    pub fn is_selectable(self) -> bool {
        matches!(self, RowType::Modified | RowType::Added)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordTokenType {
    Same,
    Add,
    Del,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordToken {
    #[serde(rename = "type")]
    pub token_type: WordTokenType,
    pub value: String,
}

/// One index-aligned line comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRow {
    #[serde(rename = "type")]
    pub row_type: RowType,
    pub left: String,
    pub right: String,
    pub index: usize,
    /// Only set on modified rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_diff: Option<Vec<WordToken>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub file: String,
    pub rows: Vec<DiffRow>,
    pub changed: bool,
}

impl FileDiff {
    pub fn new(file: String, rows: Vec<DiffRow>) -> Self {
        let changed = rows.iter().any(|r| r.row_type != RowType::Same);
        Self { file, rows, changed }
    }

    pub fn row(&self, index: usize) -> Option<&DiffRow> {
        self.rows.iter().find(|r| r.index == index)
    }
}

/// `files` is the displayed view; `full` always holds every file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub files: Vec<FileDiff>,
    pub full: Vec<FileDiff>,
}

impl DiffResult {
    pub fn file(&self, name: &str) -> Option<&FileDiff> {
        self.full.iter().find(|f| f.file == name)
    }

    pub fn changed_files(&self) -> impl Iterator<Item = &FileDiff> {
        self.full.iter().filter(|f| f.changed)
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.file(name).is_some_and(|f| f.changed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    pub ignore_whitespace: bool,
    pub only_changed: bool,
}

/// The most recent comparison: both resolved snapshots and their diff
#[derive(Debug, Clone)]
pub struct LastDiff {
    pub left: Snapshot,
    pub right: Snapshot,
    pub result: DiffResult,
}
