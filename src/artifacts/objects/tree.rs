//! Directory nodes of a snapshot
//!
//! A tree names its children and records, per child, the child's digest and
//! whether it is a blob or a nested tree. Children are kept name-sorted so the
//! digest of a tree never depends on insertion order.
//!
//! ## File format
//!
//! Line 0 is the tree's own name (empty for the root), followed by one line
//! per child: `childName childHash childKind`, where childKind is `0` for a
//! blob and `1` for a tree.

use crate::artifacts::digest::Digest;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;

/// Kind marker distinguishing a tree's blob children from its subtree children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "0",
            EntryKind::Tree => "1",
        }
    }

    pub fn try_parse(token: &str) -> anyhow::Result<Self> {
        match token {
            "0" => Ok(EntryKind::Blob),
            "1" => Ok(EntryKind::Tree),
            _ => Err(anyhow::anyhow!("invalid tree entry kind: {}", token)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub name: String,
    pub kind: EntryKind,
    pub hash: Digest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    name: String,
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    pub fn new(name: impl Into<String>) -> Self {
        Tree {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert(&mut self, entry: TreeEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.values()
    }

    pub fn entry(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digest over the concatenation of `childHash + childName` for every
    /// child in name order. The tree's own name does not participate, so two
    /// directories with equal content share one stored node.
    pub fn digest(&self) -> Digest {
        let mut acc = String::new();
        for entry in self.entries.values() {
            acc.push_str(entry.hash.as_ref());
            acc.push_str(&entry.name);
        }
        Digest::of_str(&acc)
    }

    pub fn serialize(&self) -> Bytes {
        let mut out = String::new();
        out.push_str(&self.name);
        out.push('\n');
        for entry in self.entries.values() {
            out.push_str(&format!(
                "{} {} {}\n",
                entry.name,
                entry.hash,
                entry.kind.as_str()
            ));
        }
        Bytes::from(out)
    }

    pub fn deserialize(data: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(data).context("tree object is not valid UTF-8")?;
        let mut lines = text.lines();
        let name = lines.next().unwrap_or_default().to_string();
        let mut tree = Tree::new(name);

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            // child names may contain spaces, the hash and kind tokens never do
            let (rest, kind) = line
                .rsplit_once(' ')
                .with_context(|| format!("malformed tree entry: {}", line))?;
            let (child_name, hash) = rest
                .rsplit_once(' ')
                .with_context(|| format!("malformed tree entry: {}", line))?;

            tree.insert(TreeEntry::new(
                child_name.to_string(),
                EntryKind::try_parse(kind)?,
                Digest::try_parse(hash.to_string())?,
            ));
        }

        Ok(tree)
    }
}
