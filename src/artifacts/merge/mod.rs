//! Three-way merge of snapshots
//!
//! Record-level reconciliation sits here; the line-level work lives in
//! [`three_way`]. Each side's flattened snapshot is reduced to a [`Patch`]
//! against the common ancestor; one-sided changes apply directly, two-sided
//! ones drop down to the line merge. Marker-bearing conflict content is still
//! hashed and stored, so the resulting record map is always complete.

pub mod state;
pub mod three_way;

use crate::areas::database::Database;
use crate::areas::index::IndexRecord;
use crate::artifacts::digest::Digest;
use crate::artifacts::objects::blob::Blob;
use bytes::Bytes;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

/// One branch's record-level change set against the common ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub branch_name: String,
    pub added: BTreeMap<String, Digest>,
    pub deleted: BTreeSet<String>,
    pub modified: BTreeMap<String, Digest>,
}

impl Patch {
    pub fn between(
        branch_name: &str,
        base: &BTreeMap<String, IndexRecord>,
        side: &BTreeMap<String, IndexRecord>,
    ) -> Self {
        let mut added = BTreeMap::new();
        let mut deleted = BTreeSet::new();
        let mut modified = BTreeMap::new();

        for (path, record) in side {
            match base.get(path) {
                None => {
                    added.insert(path.clone(), record.blob_hash().clone());
                }
                Some(base_record) if base_record.blob_hash() != record.blob_hash() => {
                    modified.insert(path.clone(), record.blob_hash().clone());
                }
                Some(_) => {}
            }
        }
        for path in base.keys() {
            if !side.contains_key(path) {
                deleted.insert(path.clone());
            }
        }

        Patch {
            branch_name: branch_name.to_string(),
            added,
            deleted,
            modified,
        }
    }

    /// The digest this patch stages for a path, whether added or modified.
    fn change_for(&self, path: &str) -> Option<&Digest> {
        self.added.get(path).or_else(|| self.modified.get(path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub records: BTreeMap<String, IndexRecord>,
    pub conflict_paths: Vec<String>,
}

#[derive(Debug, new)]
pub struct Merger<'a> {
    database: &'a Database,
}

impl<'a> Merger<'a> {
    pub fn merge(
        &self,
        base: &BTreeMap<String, IndexRecord>,
        left: &BTreeMap<String, IndexRecord>,
        right: &BTreeMap<String, IndexRecord>,
        left_label: &str,
        right_label: &str,
    ) -> anyhow::Result<MergeResult> {
        let left_patch = Patch::between(left_label, base, left);
        let right_patch = Patch::between(right_label, base, right);

        let mut records = base.clone();
        let mut conflict_paths = Vec::new();

        // a deletion loses to the other side's concurrent modification
        for path in &left_patch.deleted {
            if !right_patch.modified.contains_key(path) {
                records.remove(path);
            }
        }
        for path in &right_patch.deleted {
            if !left_patch.modified.contains_key(path) {
                records.remove(path);
            }
        }

        let touched = left_patch
            .added
            .keys()
            .chain(left_patch.modified.keys())
            .chain(right_patch.added.keys())
            .chain(right_patch.modified.keys())
            .cloned()
            .collect::<BTreeSet<_>>();

        for path in touched {
            match (left_patch.change_for(&path), right_patch.change_for(&path)) {
                (Some(hash), None) | (None, Some(hash)) => {
                    records.insert(path.clone(), IndexRecord::new(path, hash.clone()));
                }
                (Some(left_hash), Some(right_hash)) if left_hash == right_hash => {
                    records.insert(path.clone(), IndexRecord::new(path, left_hash.clone()));
                }
                (Some(left_hash), Some(right_hash)) => {
                    let base_lines = match base.get(&path) {
                        Some(record) => self.blob_lines(record.blob_hash())?,
                        None => Vec::new(),
                    };
                    let left_lines = self.blob_lines(left_hash)?;
                    let right_lines = self.blob_lines(right_hash)?;

                    let blocks = three_way::merge_blocks(&base_lines, &left_lines, &right_lines);
                    let (content, has_conflict) =
                        three_way::render(&blocks, left_label, right_label);

                    let merged_hash = self.database.store_blob(Bytes::from(content))?;
                    records.insert(path.clone(), IndexRecord::new(path.clone(), merged_hash));
                    if has_conflict {
                        conflict_paths.push(path);
                    }
                }
                (None, None) => {}
            }
        }

        Ok(MergeResult {
            records,
            conflict_paths,
        })
    }

    fn blob_lines(&self, hash: &Digest) -> anyhow::Result<Vec<String>> {
        Ok(Blob::new(self.database.load_blob(hash)?).lines())
    }
}
