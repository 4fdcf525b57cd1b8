use super::types::{DiffResult, RowType};
use crate::snapshot::Snapshot;

/// Unified-diff-like text of every changed file; unchanged rows are left out
pub fn generate_patch(left: &Snapshot, right: &Snapshot, diff: &DiffResult) -> String {
    let mut out = vec![format!("--- {}", left.name()), format!("+++ {}", right.name())];

    for file in diff.changed_files() {
        out.push(format!("diff -- {}", file.file));
        for row in &file.rows {
            match row.row_type {
                RowType::Same => {}
                RowType::Removed => out.push(format!("- {}", row.left)),
                RowType::Added => out.push(format!("+ {}", row.right)),
                RowType::Modified => {
                    out.push(format!("- {}", row.left));
                    out.push(format!("+ {}", row.right));
                }
            }
        }
    }

    out.join("\n")
}
