use super::types::DiffResult;
use crate::constant::EMPTY_VALUE;
use crate::snapshot::Snapshot;

/// Scalar fields summarized in the changelog, with their labels
const SUMMARIZED_FIELDS: [(&str, &str); 3] = [
    ("role", "role"),
    ("memory", "memory mode"),
    ("hierarchy", "hierarchy"),
];

/// Comma-separated tool list, trimmed and deduplicated in first-seen order
pub fn parse_tools(raw: &str) -> Vec<&str> {
    let mut tools: Vec<&str> = Vec::new();
    for tool in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tools.contains(&tool) {
            tools.push(tool);
        }
    }
    tools
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { EMPTY_VALUE } else { value }
}

/// Markdown summary of the field-level changes between two snapshots.
///
/// Only tools, a few scalar fields and the list of changed files are
/// summarized; the per-line detail stays in `diff`.
pub fn generate_changelog(left: &Snapshot, right: &Snapshot, diff: &DiffResult) -> String {
    let mut changes: Vec<String> = Vec::new();

    let left_tools = parse_tools(left.field("tools"));
    let right_tools = parse_tools(right.field("tools"));
    let added: Vec<&str> = right_tools
        .iter()
        .filter(|t| !left_tools.contains(t))
        .copied()
        .collect();
    let removed: Vec<&str> = left_tools
        .iter()
        .filter(|t| !right_tools.contains(t))
        .copied()
        .collect();

    if !added.is_empty() {
        changes.push(format!("- Added tools: {}", added.join(", ")));
    }
    if !removed.is_empty() {
        changes.push(format!("- Removed tools: {}", removed.join(", ")));
    }

    for (key, label) in SUMMARIZED_FIELDS {
        let (l, r) = (left.field(key), right.field(key));
        if l != r {
            changes.push(format!(
                "- Modified {}: {} → {}",
                label,
                or_placeholder(l),
                or_placeholder(r)
            ));
        }
    }

    let changed_files: Vec<&str> = diff.changed_files().map(|f| f.file.as_str()).collect();
    if !changed_files.is_empty() {
        changes.push(format!("- Changed files: {}", changed_files.join(", ")));
    }

    if changes.is_empty() {
        changes.push("- No significant changes detected.".to_string());
    }

    let mut lines = vec![
        "# Changelog".to_string(),
        String::new(),
        format!("- From: **{}**", left.name()),
        format!("- To: **{}**", right.name()),
        String::new(),
    ];
    lines.extend(changes);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FileMap, FormData};
    use crate::history::aggregate::diff_snapshots;
    use crate::history::types::DiffOptions;
    use crate::snapshot::SnapshotSource;
    use chrono::Utc;

    fn snapshot(name: &str, fields: &[(&str, &str)]) -> Snapshot {
        let form: FormData = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let generator = |data: &FormData| -> FileMap {
            let mut files = FileMap::new();
            files.insert(
                "Tools.md".into(),
                format!("Available Tools\n{}\n", data.get("tools").cloned().unwrap_or_default()),
            );
            files
        };
        Snapshot::capture(&form, name, SnapshotSource::Manual, &generator, Utc::now())
    }

    fn changelog(left: &Snapshot, right: &Snapshot) -> String {
        let diff = diff_snapshots(left, right, &DiffOptions::default());
        generate_changelog(left, right, &diff)
    }

    #[test]
    fn test_parse_tools() {
        assert_eq!(parse_tools(" a, b ,, a,c "), vec!["a", "b", "c"]);
        assert!(parse_tools("").is_empty());
    }

    #[test]
    fn test_tool_set_difference() {
        let left = snapshot("left", &[("tools", "a, b")]);
        let right = snapshot("right", &[("tools", "b, c")]);

        let log = changelog(&left, &right);
        assert!(log.contains("- Added tools: c"));
        assert!(log.contains("- Removed tools: a"));
        assert!(log.contains("- Changed files: Tools.md"));
        assert!(log.starts_with("# Changelog\n\n- From: **left**\n- To: **right**\n\n"));
    }

    #[test]
    fn test_modified_fields_use_placeholder() {
        let left = snapshot("v1", &[("role", "Builder"), ("memory", "")]);
        let right = snapshot("v2", &[("role", "Critic"), ("memory", "Persistent")]);

        let log = changelog(&left, &right);
        assert!(log.contains("- Modified role: Builder → Critic"));
        assert!(log.contains("- Modified memory mode: ∅ → Persistent"));
        assert!(!log.contains("hierarchy"));
        assert!(!log.contains("Changed files"));
    }

    #[test]
    fn test_missing_and_blank_fields_are_equal() {
        let left = snapshot("v1", &[("hierarchy", "")]);
        let right = snapshot("v2", &[]);
        assert!(!changelog(&left, &right).contains("hierarchy"));
    }

    #[test]
    fn test_no_changes() {
        let left = snapshot("v1", &[("tools", "x")]);
        let right = snapshot("v2", &[("tools", "x")]);

        let log = changelog(&left, &right);
        assert_eq!(
            log,
            "# Changelog\n\n- From: **v1**\n- To: **v2**\n\n- No significant changes detected."
        );
    }
}
