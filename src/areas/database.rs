//! Content-addressed object store
//!
//! Blobs, trees, commits and stash commits live in separate subdirectories of
//! `.vit/objects`, each object stored in a file named by its digest. Writes
//! are idempotent (an existing file is never rewritten) and atomic (temp file
//! plus rename). Misses surface as [`VcsError::ObjectNotFound`] and are never
//! recovered locally.

use crate::artifacts::digest::Digest;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::stash::StashCommit;
use crate::errors::VcsError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

const BLOBS_DIR: &str = "blobs";
const TREES_DIR: &str = "trees";
const COMMITS_DIR: &str = "commits";
const STASH_DIR: &str = "stash";

#[derive(Debug, new)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    // ---- blobs ----

    pub fn store_blob(&self, data: Bytes) -> anyhow::Result<Digest> {
        let digest = Digest::of_bytes(&data);
        self.store_object(BLOBS_DIR, &digest, data)?;
        Ok(digest)
    }

    pub fn blob_exists(&self, hash: &Digest) -> bool {
        self.object_path(BLOBS_DIR, hash).exists()
    }

    pub fn load_blob(&self, hash: &Digest) -> anyhow::Result<Bytes> {
        self.read_object(BLOBS_DIR, hash, "blob")
    }

    pub fn all_blobs(&self) -> anyhow::Result<BTreeSet<Digest>> {
        self.list_objects(BLOBS_DIR)
    }

    pub fn delete_blob(&self, hash: &Digest) -> anyhow::Result<()> {
        self.delete_object(BLOBS_DIR, hash)
    }

    // ---- trees ----

    pub fn store_tree(&self, tree: &Tree) -> anyhow::Result<Digest> {
        let digest = tree.digest();
        self.store_object(TREES_DIR, &digest, tree.serialize())?;
        Ok(digest)
    }

    pub fn tree_exists(&self, hash: &Digest) -> bool {
        self.object_path(TREES_DIR, hash).exists()
    }

    pub fn load_tree(&self, hash: &Digest) -> anyhow::Result<Tree> {
        Tree::deserialize(&self.read_object(TREES_DIR, hash, "tree")?)
    }

    pub fn all_trees(&self) -> anyhow::Result<BTreeSet<Digest>> {
        self.list_objects(TREES_DIR)
    }

    pub fn delete_tree_node(&self, hash: &Digest) -> anyhow::Result<()> {
        self.delete_object(TREES_DIR, hash)
    }

    // ---- commits ----

    pub fn store_commit(&self, commit: &Commit) -> anyhow::Result<Digest> {
        let digest = commit.digest();
        self.store_object(COMMITS_DIR, &digest, commit.serialize())?;
        Ok(digest)
    }

    pub fn commit_exists(&self, hash: &Digest) -> bool {
        self.object_path(COMMITS_DIR, hash).exists()
    }

    pub fn load_commit(&self, hash: &Digest) -> anyhow::Result<Commit> {
        Commit::deserialize(&self.read_object(COMMITS_DIR, hash, "commit")?)
    }

    pub fn all_commits(&self) -> anyhow::Result<BTreeSet<Digest>> {
        self.list_objects(COMMITS_DIR)
    }

    pub fn delete_commit(&self, hash: &Digest) -> anyhow::Result<()> {
        self.delete_object(COMMITS_DIR, hash)
    }

    // ---- stash commits ----

    pub fn store_stash_commit(&self, stash: &StashCommit) -> anyhow::Result<Digest> {
        let digest = stash.digest();
        self.store_object(STASH_DIR, &digest, stash.serialize()?)?;
        Ok(digest)
    }

    pub fn load_stash_commit(&self, hash: &Digest) -> anyhow::Result<StashCommit> {
        StashCommit::deserialize(&self.read_object(STASH_DIR, hash, "stash")?)
    }

    pub fn all_stash_commits(&self) -> anyhow::Result<BTreeSet<Digest>> {
        self.list_objects(STASH_DIR)
    }

    pub fn delete_stash_commit(&self, hash: &Digest) -> anyhow::Result<()> {
        self.delete_object(STASH_DIR, hash)
    }

    // ---- plumbing ----

    fn object_path(&self, dir: &str, hash: &Digest) -> PathBuf {
        self.path.join(dir).join(hash.as_ref())
    }

    fn store_object(&self, dir: &str, digest: &Digest, content: Bytes) -> anyhow::Result<()> {
        let object_path = self.object_path(dir, digest);

        // content-addressed: an existing object is already the right bytes
        if object_path.exists() {
            return Ok(());
        }

        let object_dir = object_path
            .parent()
            .context("object path has no parent directory")?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("unable to create object directory {}", object_dir.display())
        })?;

        // write to a temp name, then rename to make the write atomic
        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!(
                    "unable to open object file {}",
                    temp_object_path.display()
                )
            })?;
        file.write_all(&content).with_context(|| {
            format!(
                "unable to write object file {}",
                temp_object_path.display()
            )
        })?;

        std::fs::rename(&temp_object_path, &object_path).with_context(|| {
            format!("unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn read_object(&self, dir: &str, hash: &Digest, kind: &'static str) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(dir, hash);
        if !object_path.exists() {
            return Err(VcsError::ObjectNotFound {
                kind,
                hash: hash.to_string(),
            }
            .into());
        }

        let content = std::fs::read(&object_path)
            .with_context(|| format!("unable to read object file {}", object_path.display()))?;
        Ok(content.into())
    }

    fn list_objects(&self, dir: &str) -> anyhow::Result<BTreeSet<Digest>> {
        let dir_path = self.path.join(dir);
        if !dir_path.is_dir() {
            return Ok(BTreeSet::new());
        }

        let mut digests = BTreeSet::new();
        for entry in std::fs::read_dir(&dir_path)
            .with_context(|| format!("unable to list object directory {}", dir_path.display()))?
        {
            let entry = entry?;
            if let Ok(digest) = Digest::try_parse(entry.file_name().to_string_lossy().to_string())
            {
                digests.insert(digest);
            }
        }
        Ok(digests)
    }

    fn delete_object(&self, dir: &str, hash: &Digest) -> anyhow::Result<()> {
        let object_path = self.object_path(dir, hash);
        std::fs::remove_file(&object_path)
            .with_context(|| format!("unable to delete object file {}", object_path.display()))
    }

    fn generate_temp_name() -> String {
        format!(
            "tmp-obj-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        )
    }
}
