//! The repository facade
//!
//! Ties the areas together: the working directory, the `.vit` metadata
//! directory with the object database, the staging index and the refs. All
//! user-facing commands are methods on [`Repository`] (one file per command
//! under `crate::commands`); everything here is the shared plumbing they sit
//! on.
//!
//! Output goes through an injected writer so tests can capture it.

use crate::areas::database::Database;
use crate::areas::ignore::IgnoreRules;
use crate::areas::index::{Index, IndexRecord};
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::digest::Digest;
use crate::artifacts::merge::state::MergeState;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::snapshot::Snapshots;
use crate::errors::VcsError;
use anyhow::Context;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

pub const METADATA_DIR: &str = ".vit";

const OBJECTS_DIR: &str = "objects";
const INDEX_FILE: &str = "index";

pub struct Repository {
    root: Box<Path>,
    writer: RefCell<Box<dyn Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    ignores: IgnoreRules,
}

impl Repository {
    /// Open (creating the root directory if needed) without requiring `.vit`
    /// to exist yet. `init` is the only caller that needs that.
    pub fn at(root: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("unable to create directory {}", root.display()))?;
        let root = root
            .canonicalize()
            .with_context(|| format!("unable to resolve path {}", root.display()))?;

        Self::open(root.into_boxed_path(), writer)
    }

    /// Walk upward from `start` until a directory containing `.vit` is found.
    pub fn discover(start: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let start = start
            .canonicalize()
            .with_context(|| format!("unable to resolve path {}", start.display()))?;

        let mut candidate = Some(start.as_path());
        while let Some(dir) = candidate {
            if dir.join(METADATA_DIR).is_dir() {
                return Self::open(dir.to_path_buf().into_boxed_path(), writer);
            }
            candidate = dir.parent();
        }

        Err(VcsError::RepositoryNotFound(start.display().to_string()).into())
    }

    fn open(root: Box<Path>, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let metadata = root.join(METADATA_DIR);
        let index = Index::load(metadata.join(INDEX_FILE).into_boxed_path())?;
        let database = Database::new(metadata.join(OBJECTS_DIR).into_boxed_path());
        let workspace = Workspace::new(root.clone());
        let refs = Refs::new(metadata.into_boxed_path());
        let ignores = IgnoreRules::load(&root)?;

        Ok(Repository {
            root,
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
            ignores,
        })
    }

    // ---- accessors ----

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_path(&self) -> std::path::PathBuf {
        self.root.join(METADATA_DIR)
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Ref<'_, Index> {
        self.index.borrow()
    }

    pub fn index_mut(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn ignores(&self) -> &IgnoreRules {
        &self.ignores
    }

    pub fn snapshots(&self) -> Snapshots<'_> {
        Snapshots::new(&self.database)
    }

    // ---- shared queries ----

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(&self.refs.head_commit_hash()?)
    }

    pub fn head_tree_hash(&self) -> anyhow::Result<Digest> {
        Ok(self.head_commit()?.tree_hash().clone())
    }

    /// A revision argument is either a branch name or a full commit digest.
    pub fn resolve_revision(&self, revision: &str) -> anyhow::Result<Digest> {
        if self.refs.branch_exists(revision) {
            return Ok(self.refs.branch_by_name(revision)?.commit_hash);
        }
        if let Ok(hash) = Digest::try_parse(revision.to_string())
            && self.database.commit_exists(&hash)
        {
            return Ok(hash);
        }

        Err(VcsError::InvalidRevision(revision.to_string()).into())
    }

    /// The flat path map of the commit HEAD resolves to.
    pub fn head_records(&self) -> anyhow::Result<BTreeMap<String, IndexRecord>> {
        self.snapshots().records_at(&self.head_tree_hash()?)
    }

    /// True when the index matches HEAD and the working tree matches the
    /// index. Destructive commands gate on this.
    pub fn is_clean(&self) -> anyhow::Result<bool> {
        let index = self.index.borrow();
        if index.records() != &self.head_records()? {
            return Ok(false);
        }

        let mut seen = 0usize;
        for relative in self.workspace.list_files(&self.ignores)? {
            let path = relative.to_string_lossy().replace('\\', "/");
            let Some(record) = index.record_by_path(&path) else {
                return Ok(false);
            };
            if &Digest::of_bytes(&self.workspace.read_file(&relative)?) != record.blob_hash() {
                return Ok(false);
            }
            seen += 1;
        }

        // a tracked file deleted on disk is also a difference
        Ok(seen == index.records().len())
    }

    pub fn ensure_clean(&self) -> anyhow::Result<()> {
        if self.is_clean()? {
            Ok(())
        } else {
            Err(VcsError::DirtyWorkingTree.into())
        }
    }

    // ---- shared mutations ----

    /// Replace the index with the contents of a stored tree.
    pub fn reset_index_to(&self, tree_hash: &Digest) -> anyhow::Result<()> {
        let records = self.snapshots().records_at(tree_hash)?;
        let mut index = self.index.borrow_mut();
        index.replace(records);
        index.save()
    }

    /// Replace the working tree with the contents of a stored tree. Ignored
    /// files are left alone.
    pub fn reset_workspace_to(&self, tree_hash: &Digest) -> anyhow::Result<()> {
        self.workspace.clear(&self.ignores)?;
        for (path, record) in self.snapshots().records_at(tree_hash)? {
            let data = self.database.load_blob(record.blob_hash())?;
            self.workspace.write_file(Path::new(&path), &data)?;
        }
        Ok(())
    }

    // ---- merge marker ----

    pub fn merge_state(&self) -> anyhow::Result<MergeState> {
        MergeState::load(&self.refs.merge_head_path())
    }

    pub fn set_merge_state(&self, state: &MergeState) -> anyhow::Result<()> {
        state.persist(&self.refs.merge_head_path())
    }
}
