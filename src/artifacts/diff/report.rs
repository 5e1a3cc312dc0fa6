//! Diff reporting
//!
//! Two layers: record-level classification of two flattened snapshots into
//! added/deleted/modified paths, and line-level hunk rendering for the
//! modified ones. A hunk carries up to two context lines on each side of a
//! change run; hunks are separated by a blank line. Removed lines are
//! `-`-prefixed and red, added lines `+`-prefixed and green.

use crate::areas::index::IndexRecord;
use crate::artifacts::diff::myers::{Edit, MyersDiff};
use colored::Colorize;
use derive_new::new;
use std::collections::BTreeMap;

pub const CONTEXT_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RecordChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Classify paths by presence and blob digest, in path order.
pub fn classify_records(
    old: &BTreeMap<String, IndexRecord>,
    new: &BTreeMap<String, IndexRecord>,
) -> Vec<RecordChange> {
    let mut changes = Vec::new();

    for (path, old_record) in old {
        match new.get(path) {
            None => changes.push(RecordChange::new(path.clone(), ChangeKind::Deleted)),
            Some(new_record) if new_record.blob_hash() != old_record.blob_hash() => {
                changes.push(RecordChange::new(path.clone(), ChangeKind::Modified));
            }
            Some(_) => {}
        }
    }
    for path in new.keys() {
        if !old.contains_key(path) {
            changes.push(RecordChange::new(path.clone(), ChangeKind::Added));
        }
    }

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}

/// Hunked, colored line diff between two versions of one file.
pub fn render_line_diff(old: &[String], new: &[String]) -> String {
    let edits = MyersDiff::new(old, new).edit_script();

    let changed = edits
        .iter()
        .enumerate()
        .filter(|(_, edit)| !matches!(edit, Edit::Equal { .. }))
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    if changed.is_empty() {
        return String::new();
    }

    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for &i in &changed {
        let start = i.saturating_sub(CONTEXT_LINES);
        let end = (i + CONTEXT_LINES + 1).min(edits.len());
        match hunks.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => hunks.push((start, end)),
        }
    }

    let mut rendered = Vec::new();
    for (start, end) in hunks {
        let mut lines = Vec::new();
        for edit in &edits[start..end] {
            match edit {
                Edit::Delete { value } => lines.push(format!("-{value}").red().to_string()),
                Edit::Insert { value } => lines.push(format!("+{value}").green().to_string()),
                Edit::Equal { value } => lines.push(format!(" {value}")),
            }
        }
        rendered.push(lines.join("\n"));
    }

    let mut report = rendered.join("\n\n");
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::digest::Digest;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record_map(entries: &[(&str, &str)]) -> BTreeMap<String, IndexRecord> {
        entries
            .iter()
            .map(|(path, content)| {
                (
                    path.to_string(),
                    IndexRecord::new(path.to_string(), Digest::of_str(content)),
                )
            })
            .collect()
    }

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[rstest]
    fn classification_covers_all_three_kinds() {
        let old = record_map(&[("kept.txt", "same"), ("gone.txt", "old"), ("edit.txt", "v1")]);
        let new = record_map(&[("kept.txt", "same"), ("new.txt", "new"), ("edit.txt", "v2")]);

        let changes = classify_records(&old, &new);
        assert_eq!(
            changes,
            vec![
                RecordChange::new("edit.txt".to_string(), ChangeKind::Modified),
                RecordChange::new("gone.txt".to_string(), ChangeKind::Deleted),
                RecordChange::new("new.txt".to_string(), ChangeKind::Added),
            ]
        );
    }

    #[rstest]
    fn identical_files_render_nothing() {
        colored::control::set_override(false);
        let content = lines(&["a", "b"]);
        assert_eq!(render_line_diff(&content, &content), String::new());
    }

    #[rstest]
    fn a_change_run_carries_two_context_lines() {
        colored::control::set_override(false);
        let old = lines(&["1", "2", "3", "4", "5", "6", "7"]);
        let new = lines(&["1", "2", "3", "CHANGED", "5", "6", "7"]);

        let report = render_line_diff(&old, &new);
        assert_eq!(report, " 2\n 3\n-4\n+CHANGED\n 5\n 6\n");
    }

    #[rstest]
    fn distant_changes_split_into_separate_hunks() {
        colored::control::set_override(false);
        let old = lines(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
        let new = lines(&["ONE", "2", "3", "4", "5", "6", "7", "8", "9", "TEN"]);

        let report = render_line_diff(&old, &new);
        let hunks = report.trim_end().split("\n\n").collect::<Vec<_>>();
        assert_eq!(hunks.len(), 2);
        assert!(hunks[0].contains("-1") && hunks[0].contains("+ONE"));
        assert!(hunks[1].contains("-10") && hunks[1].contains("+TEN"));
    }
}
