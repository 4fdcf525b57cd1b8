//! Plain-text rendering of a diff for terminals and logs.

use crate::history::{
    DiffResult, DiffRow, FileDiff, MergeSelection, RowType, WordToken, WordTokenType, file_stats,
};
use std::fmt::Write;

// Inline markers for word-level changes
const DEL_OPEN: &str = "[-";
const DEL_CLOSE: &str = "-]";
const ADD_OPEN: &str = "{+";
const ADD_CLOSE: &str = "+}";

pub const EMPTY_DIFF: &str = "No differences found.";

/// Render one side of a word diff with the other side's tokens dropped
pub fn render_word_highlight(tokens: &[WordToken], is_left: bool) -> String {
    let mut out = String::new();
    for token in tokens {
        match (token.token_type, is_left) {
            (WordTokenType::Same, _) => out.push_str(&token.value),
            (WordTokenType::Del, true) => {
                out.push_str(DEL_OPEN);
                out.push_str(&token.value);
                out.push_str(DEL_CLOSE);
            }
            (WordTokenType::Add, false) => {
                out.push_str(ADD_OPEN);
                out.push_str(&token.value);
                out.push_str(ADD_CLOSE);
            }
            _ => {}
        }
    }
    out
}

fn row_sigil(row_type: RowType) -> char {
    match row_type {
        RowType::Same => ' ',
        RowType::Added => '+',
        RowType::Removed => '-',
        RowType::Modified => '~',
    }
}

fn render_row(out: &mut String, file: &str, row: &DiffRow, selection: &MergeSelection) {
    let checkbox = if !row.row_type.is_selectable() {
        "   "
    } else if selection.contains(file, row.index) {
        "[x]"
    } else {
        "[ ]"
    };

    let (left, right) = match &row.word_diff {
        Some(tokens) => (
            render_word_highlight(tokens, true),
            render_word_highlight(tokens, false),
        ),
        None => (row.left.clone(), row.right.clone()),
    };

    let _ = writeln!(
        out,
        "{} {} {:>4} | {} | {}",
        checkbox,
        row_sigil(row.row_type),
        row.index,
        left,
        right
    );
}

fn render_file(out: &mut String, file: &FileDiff, selection: &MergeSelection) {
    let stats = file_stats(file);
    let status = match (file.changed, stats.meaningful) {
        (false, _) => "unchanged",
        (true, true) => "modified",
        (true, false) => "modified, blank lines only",
    };
    let _ = writeln!(
        out,
        "== {} ({}, +{} -{}) ==",
        file.file, status, stats.added_count, stats.removed_count
    );

    for row in &file.rows {
        render_row(out, &file.file, row, selection);
    }
}

/// File-sectioned, row-by-row view of the displayed files.
///
/// Selectable rows carry a `[ ]`/`[x]` checkbox; modified rows show
/// `[-removed-]` and `{+added+}` words inline.
pub fn render_diff(result: &DiffResult, selection: &MergeSelection) -> String {
    if result.files.is_empty() {
        return EMPTY_DIFF.to_string();
    }

    let mut out = String::new();
    for (i, file) in result.files.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_file(&mut out, file, selection);
    }
    out
}
