//! Line-level three-way merge
//!
//! Both sides are diffed against the base with Myers; each side's edit script
//! collapses into hunks (a replaced base range plus the side's replacement
//! lines). Overlapping hunk clusters from the two sides become blocks:
//! a region changed on one side only carries through, identical changes
//! auto-resolve, a region with content on only one side resolves to that
//! side, and everything else is a conflict block. Conflict blocks render as
//!
//! ```text
//! <<<<<< {left_label}
//! left lines
//! ======
//! right lines
//! >>>>>> {right_label}
//! ```

use crate::artifacts::diff::myers::{Edit, MyersDiff};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeBlock {
    Resolved(Vec<String>),
    Conflict {
        left: Vec<String>,
        right: Vec<String>,
    },
}

/// One side's rewrite of a base region: lines replacing `base[start..end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hunk {
    base_start: usize,
    base_end: usize,
    lines: Vec<String>,
}

fn hunks_against_base(base: &[String], side: &[String]) -> Vec<Hunk> {
    let edits = MyersDiff::new(base, side).edit_script();

    let mut hunks = Vec::new();
    let mut current: Option<Hunk> = None;
    let mut base_pos = 0usize;

    for edit in edits {
        match edit {
            Edit::Equal { .. } => {
                if let Some(hunk) = current.take() {
                    hunks.push(hunk);
                }
                base_pos += 1;
            }
            Edit::Delete { .. } => {
                let hunk = current.get_or_insert_with(|| Hunk {
                    base_start: base_pos,
                    base_end: base_pos,
                    lines: Vec::new(),
                });
                hunk.base_end = base_pos + 1;
                base_pos += 1;
            }
            Edit::Insert { value } => {
                let hunk = current.get_or_insert_with(|| Hunk {
                    base_start: base_pos,
                    base_end: base_pos,
                    lines: Vec::new(),
                });
                hunk.lines.push(value);
            }
        }
    }
    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }

    hunks
}

/// A hunk joins the cluster when it bites into the cluster's base range, or
/// when it is an insertion sitting exactly on the cluster boundary (two
/// insertions at the same point must land in one block).
fn joins(hunk: &Hunk, cluster_start: usize, cluster_end: usize) -> bool {
    hunk.base_start < cluster_end
        || (hunk.base_start == cluster_end
            && (hunk.base_start == hunk.base_end || cluster_start == cluster_end))
}

/// The base region `[start..end)` with one side's hunks applied.
fn apply(base: &[String], start: usize, end: usize, hunks: &[&Hunk]) -> Vec<String> {
    let mut region = Vec::new();
    let mut pos = start;

    for hunk in hunks {
        region.extend_from_slice(&base[pos..hunk.base_start]);
        region.extend(hunk.lines.iter().cloned());
        pos = hunk.base_end;
    }
    region.extend_from_slice(&base[pos..end]);

    region
}

pub fn merge_blocks(base: &[String], left: &[String], right: &[String]) -> Vec<MergeBlock> {
    let left_hunks = hunks_against_base(base, left);
    let right_hunks = hunks_against_base(base, right);

    let mut blocks = Vec::new();
    let (mut li, mut ri) = (0usize, 0usize);
    let mut pos = 0usize;

    while li < left_hunks.len() || ri < right_hunks.len() {
        let cluster_start = match (left_hunks.get(li), right_hunks.get(ri)) {
            (Some(l), Some(r)) => l.base_start.min(r.base_start),
            (Some(l), None) => l.base_start,
            (None, Some(r)) => r.base_start,
            (None, None) => break,
        };
        let mut cluster_end = cluster_start;

        let mut cluster_left: Vec<&Hunk> = Vec::new();
        let mut cluster_right: Vec<&Hunk> = Vec::new();
        loop {
            let mut grew = false;
            while li < left_hunks.len() && joins(&left_hunks[li], cluster_start, cluster_end) {
                cluster_end = cluster_end.max(left_hunks[li].base_end);
                cluster_left.push(&left_hunks[li]);
                li += 1;
                grew = true;
            }
            while ri < right_hunks.len() && joins(&right_hunks[ri], cluster_start, cluster_end) {
                cluster_end = cluster_end.max(right_hunks[ri].base_end);
                cluster_right.push(&right_hunks[ri]);
                ri += 1;
                grew = true;
            }
            if !grew {
                break;
            }
        }

        if pos < cluster_start {
            blocks.push(MergeBlock::Resolved(base[pos..cluster_start].to_vec()));
        }

        let left_region = apply(base, cluster_start, cluster_end, &cluster_left);
        let right_region = apply(base, cluster_start, cluster_end, &cluster_right);
        let base_region = &base[cluster_start..cluster_end];

        let block = if cluster_left.is_empty() {
            MergeBlock::Resolved(right_region)
        } else if cluster_right.is_empty() {
            MergeBlock::Resolved(left_region)
        } else if left_region == right_region {
            MergeBlock::Resolved(left_region)
        } else if left_region.as_slice() == base_region {
            MergeBlock::Resolved(right_region)
        } else if right_region.as_slice() == base_region {
            MergeBlock::Resolved(left_region)
        } else if left_region.is_empty() {
            MergeBlock::Resolved(right_region)
        } else if right_region.is_empty() {
            MergeBlock::Resolved(left_region)
        } else {
            MergeBlock::Conflict {
                left: left_region,
                right: right_region,
            }
        };
        blocks.push(block);

        pos = cluster_end;
    }

    if pos < base.len() {
        blocks.push(MergeBlock::Resolved(base[pos..].to_vec()));
    }

    blocks
}

/// Flatten blocks into file content. Returns the content and whether any
/// conflict block was emitted.
pub fn render(blocks: &[MergeBlock], left_label: &str, right_label: &str) -> (String, bool) {
    let mut lines = Vec::new();
    let mut has_conflict = false;

    for block in blocks {
        match block {
            MergeBlock::Resolved(resolved) => lines.extend(resolved.iter().cloned()),
            MergeBlock::Conflict { left, right } => {
                has_conflict = true;
                lines.push(format!("<<<<<< {left_label}"));
                lines.extend(left.iter().cloned());
                lines.push("======".to_string());
                lines.extend(right.iter().cloned());
                lines.push(format!(">>>>>> {right_label}"));
            }
        }
    }

    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    (content, has_conflict)
}
