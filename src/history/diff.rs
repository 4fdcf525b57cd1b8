use super::types::{DiffOptions, DiffRow, RowType};
use super::word::diff_words;
use std::borrow::Cow;

fn normalize_line(line: &str, ignore_whitespace: bool) -> Cow<'_, str> {
    if ignore_whitespace {
        Cow::Owned(line.split_whitespace().collect::<Vec<_>>().join(" "))
    } else {
        Cow::Borrowed(line)
    }
}

/// Compare two texts line by line, pairing lines by index.
///
/// Lines are not realigned: one inserted line shows up as a run of modified
/// rows below it. The generated files are short and field-labelled, so this
/// is kept as is.
pub fn diff_lines(left_text: &str, right_text: &str, options: &DiffOptions) -> Vec<DiffRow> {
    let left: Vec<&str> = left_text.split('\n').collect();
    let right: Vec<&str> = right_text.split('\n').collect();
    let max = left.len().max(right.len());

    let mut rows = Vec::with_capacity(max);
    for index in 0..max {
        let l = left.get(index).copied().unwrap_or("");
        let r = right.get(index).copied().unwrap_or("");

        let (row_type, word_diff) = if l.is_empty() && !r.is_empty() {
            (RowType::Added, None)
        } else if !l.is_empty() && r.is_empty() {
            (RowType::Removed, None)
        } else if normalize_line(l, options.ignore_whitespace)
            != normalize_line(r, options.ignore_whitespace)
        {
            (RowType::Modified, Some(diff_words(l, r)))
        } else {
            (RowType::Same, None)
        };

        rows.push(DiffRow {
            row_type,
            left: l.to_string(),
            right: r.to_string(),
            index,
            word_diff,
        });
    }

    rows
}

/// Check if rows contain any non-blank change
pub fn has_meaningful_changes(rows: &[DiffRow]) -> bool {
    rows.iter().any(|row| match row.row_type {
        RowType::Same => false,
        RowType::Added => !row.right.trim().is_empty(),
        RowType::Removed => !row.left.trim().is_empty(),
        RowType::Modified => true,
    })
}
