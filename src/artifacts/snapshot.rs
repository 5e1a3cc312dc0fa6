//! Tree building and walking over the object store
//!
//! `build` turns the index's flat path map into the persisted tree hierarchy
//! in two phases: first the full unhashed hierarchy is assembled, then a
//! bottom-up pass digests and stores every node. Hashing never runs against a
//! half-built structure, and permuting the input order cannot change the root
//! digest.
//!
//! `records_at` is the inverse walk: a pre-order flatten of a stored tree back
//! into the flat path map.

use crate::areas::database::Database;
use crate::areas::ignore::IgnoreRules;
use crate::areas::index::IndexRecord;
use crate::areas::workspace::Workspace;
use crate::artifacts::digest::Digest;
use crate::artifacts::objects::tree::{EntryKind, Tree, TreeEntry};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, new)]
pub struct Snapshots<'a> {
    database: &'a Database,
}

/// Phase-one staging node: the hierarchy without any digests.
#[derive(Debug, Default)]
struct Node {
    subdirs: BTreeMap<String, Node>,
    files: BTreeMap<String, Digest>,
}

impl Node {
    fn insert(&mut self, components: &[&str], blob_hash: &Digest) {
        match components {
            [file_name] => {
                self.files.insert(file_name.to_string(), blob_hash.clone());
            }
            [dir_name, rest @ ..] => {
                self.subdirs
                    .entry(dir_name.to_string())
                    .or_default()
                    .insert(rest, blob_hash);
            }
            [] => {}
        }
    }
}

impl<'a> Snapshots<'a> {
    /// Persist the hierarchy for a flat path map and return the root digest.
    pub fn build(&self, records: &BTreeMap<String, IndexRecord>) -> anyhow::Result<Digest> {
        let mut root = Node::default();
        for (path, record) in records {
            let components = path.split('/').collect::<Vec<_>>();
            root.insert(&components, record.blob_hash());
        }

        self.persist(&root, "")
    }

    fn persist(&self, node: &Node, name: &str) -> anyhow::Result<Digest> {
        let mut tree = Tree::new(name);

        for (child_name, child) in &node.subdirs {
            let child_hash = self.persist(child, child_name)?;
            tree.insert(TreeEntry::new(
                child_name.clone(),
                EntryKind::Tree,
                child_hash,
            ));
        }
        for (file_name, blob_hash) in &node.files {
            tree.insert(TreeEntry::new(
                file_name.clone(),
                EntryKind::Blob,
                blob_hash.clone(),
            ));
        }

        self.database.store_tree(&tree)
    }

    /// Pre-order flatten of a stored tree into a path map.
    pub fn records_at(&self, root: &Digest) -> anyhow::Result<BTreeMap<String, IndexRecord>> {
        let mut records = BTreeMap::new();
        self.collect_records(root, "", &mut records)?;
        Ok(records)
    }

    fn collect_records(
        &self,
        hash: &Digest,
        prefix: &str,
        records: &mut BTreeMap<String, IndexRecord>,
    ) -> anyhow::Result<()> {
        let tree = self.database.load_tree(hash)?;

        for entry in tree.entries() {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{}/{}", prefix, entry.name)
            };

            match entry.kind {
                EntryKind::Blob => {
                    records.insert(path.clone(), IndexRecord::new(path, entry.hash.clone()));
                }
                EntryKind::Tree => self.collect_records(&entry.hash, &path, records)?,
            }
        }

        Ok(())
    }

    /// Snapshot the on-disk working tree directly, creating any missing
    /// blobs. The index is bypassed; the stash uses this.
    pub fn from_workspace(
        &self,
        workspace: &Workspace,
        ignores: &IgnoreRules,
    ) -> anyhow::Result<Digest> {
        let mut records = BTreeMap::new();
        for relative in workspace.list_files(ignores)? {
            let data = workspace.read_file(&relative)?;
            let blob_hash = self.database.store_blob(data)?;
            let path = relative.to_string_lossy().replace('\\', "/");
            records.insert(path.clone(), IndexRecord::new(path, blob_hash));
        }

        self.build(&records)
    }

    /// Recursively delete a tree's nodes, skipping anything in `keep` (nodes
    /// shared with still-live snapshots). Blobs are swept separately.
    pub fn delete_tree(&self, root: &Digest, keep: &BTreeSet<Digest>) -> anyhow::Result<()> {
        if keep.contains(root) || !self.database.tree_exists(root) {
            return Ok(());
        }

        let tree = self.database.load_tree(root)?;
        for entry in tree.entries() {
            if entry.kind == EntryKind::Tree {
                self.delete_tree(&entry.hash, keep)?;
            }
        }

        self.database.delete_tree_node(root)
    }

    /// Every tree node and blob reachable from a root tree.
    pub fn tree_closure(
        &self,
        root: &Digest,
        trees: &mut BTreeSet<Digest>,
        blobs: &mut BTreeSet<Digest>,
    ) -> anyhow::Result<()> {
        if !trees.insert(root.clone()) {
            return Ok(());
        }

        let tree = self.database.load_tree(root)?;
        for entry in tree.entries() {
            match entry.kind {
                EntryKind::Blob => {
                    blobs.insert(entry.hash.clone());
                }
                EntryKind::Tree => self.tree_closure(&entry.hash, trees, blobs)?,
            }
        }

        Ok(())
    }
}
