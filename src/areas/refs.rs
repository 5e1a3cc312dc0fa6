//! Branch references and HEAD
//!
//! A branch is a file under `.vit/refs/heads/` whose content is the digest of
//! its tip commit. Hierarchical names (`feature/login`) map to subdirectories.
//!
//! HEAD holds the name of the active branch. A detached HEAD is an explicit
//! extra file, DETACHED_HEAD, with three lines: the checked-out commit, the
//! branch that was active before detaching, and that branch's tip at the time
//! (orig-head). While detached, commits move only the DETACHED_HEAD pointer;
//! switching back to the recorded branch restores its ref to orig-head and
//! removes the file.

use crate::artifacts::digest::Digest;
use crate::errors::VcsError;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_BRANCH: &str = "main";

const HEAD_FILE: &str = "HEAD";
const DETACHED_HEAD_FILE: &str = "DETACHED_HEAD";
const MERGE_HEAD_FILE: &str = "MERGE_HEAD";
const STASH_HEAD_FILE: &str = "STASH_HEAD";
const REFS_DIR: &str = "refs";
const HEADS_DIR: &str = "heads";

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Branch {
    pub name: String,
    pub commit_hash: Digest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    Attached {
        branch: String,
    },
    Detached {
        commit: Digest,
        previous_branch: String,
        orig_head: Digest,
    },
}

#[derive(Debug, new)]
pub struct Refs {
    /// The `.vit` metadata directory.
    path: Box<Path>,
}

impl Refs {
    pub fn heads_path(&self) -> PathBuf {
        self.path.join(REFS_DIR).join(HEADS_DIR)
    }

    pub fn merge_head_path(&self) -> PathBuf {
        self.path.join(MERGE_HEAD_FILE)
    }

    fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_FILE)
    }

    fn detached_head_path(&self) -> PathBuf {
        self.path.join(DETACHED_HEAD_FILE)
    }

    fn stash_head_path(&self) -> PathBuf {
        self.path.join(STASH_HEAD_FILE)
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_path().join(name)
    }

    /// Whether a HEAD file exists, i.e. `init` has already run here.
    pub fn is_initialized(&self) -> bool {
        self.head_path().is_file()
    }

    // ---- branches ----

    pub fn create_branch(&self, name: &str, commit_hash: &Digest) -> anyhow::Result<()> {
        if !is_valid_branch_name(name) {
            anyhow::bail!("'{}' is not a valid branch name", name);
        }

        let branch_path = self.branch_path(name);
        if branch_path.exists() {
            anyhow::bail!("branch '{}' already exists", name);
        }

        self.write_ref_file(&branch_path, commit_hash.as_ref())
    }

    pub fn update_branch(&self, name: &str, commit_hash: &Digest) -> anyhow::Result<()> {
        let branch_path = self.branch_path(name);
        if !branch_path.exists() {
            return Err(VcsError::BranchNotFound(name.to_string()).into());
        }

        self.write_ref_file(&branch_path, commit_hash.as_ref())
    }

    pub fn delete_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch_path = self.branch_path(name);
        if !branch_path.exists() {
            return Err(VcsError::BranchNotFound(name.to_string()).into());
        }

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("unable to delete branch file {}", branch_path.display()))?;
        self.prune_empty_parent_dirs(&branch_path)
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.branch_path(name).is_file()
    }

    pub fn branch_by_name(&self, name: &str) -> anyhow::Result<Branch> {
        let branch_path = self.branch_path(name);
        if !branch_path.exists() {
            return Err(VcsError::BranchNotFound(name.to_string()).into());
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("unable to read branch file {}", branch_path.display()))?;
        Ok(Branch::new(
            name.to_string(),
            Digest::try_parse(content.trim().to_string())?,
        ))
    }

    pub fn all_branches(&self) -> anyhow::Result<Vec<Branch>> {
        let heads = self.heads_path();
        if !heads.is_dir() {
            return Ok(vec![]);
        }

        let mut branches = WalkDir::new(&heads)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry
                    .path()
                    .strip_prefix(&heads)
                    .ok()?
                    .to_string_lossy()
                    .replace('\\', "/");
                self.branch_by_name(&name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(branches)
    }

    // ---- HEAD ----

    pub fn active_branch(&self) -> anyhow::Result<String> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("unable to read HEAD file {}", head_path.display()))?;
        Ok(content.trim().to_string())
    }

    pub fn set_active_branch(&self, name: &str) -> anyhow::Result<()> {
        self.write_ref_file(&self.head_path(), name)
    }

    pub fn head_state(&self) -> anyhow::Result<HeadState> {
        let detached_path = self.detached_head_path();
        if !detached_path.exists() {
            return Ok(HeadState::Attached {
                branch: self.active_branch()?,
            });
        }

        let content = std::fs::read_to_string(&detached_path).with_context(|| {
            format!(
                "unable to read detached head file {}",
                detached_path.display()
            )
        })?;
        let mut lines = content.lines();
        let commit = Digest::try_parse(
            lines
                .next()
                .context("malformed detached head file: missing commit")?
                .to_string(),
        )?;
        let previous_branch = lines
            .next()
            .context("malformed detached head file: missing branch")?
            .to_string();
        let orig_head = Digest::try_parse(
            lines
                .next()
                .context("malformed detached head file: missing orig head")?
                .to_string(),
        )?;

        Ok(HeadState::Detached {
            commit,
            previous_branch,
            orig_head,
        })
    }

    pub fn detach(
        &self,
        commit: &Digest,
        previous_branch: &str,
        orig_head: &Digest,
    ) -> anyhow::Result<()> {
        self.write_ref_file(
            &self.detached_head_path(),
            &format!("{commit}\n{previous_branch}\n{orig_head}"),
        )
    }

    /// Move the detached pointer without touching the recorded branch state.
    pub fn move_detached(&self, commit: &Digest) -> anyhow::Result<()> {
        match self.head_state()? {
            HeadState::Detached {
                previous_branch,
                orig_head,
                ..
            } => self.detach(commit, &previous_branch, &orig_head),
            HeadState::Attached { .. } => {
                anyhow::bail!("HEAD is not detached")
            }
        }
    }

    pub fn reattach(&self) -> anyhow::Result<()> {
        let detached_path = self.detached_head_path();
        if detached_path.exists() {
            std::fs::remove_file(&detached_path).with_context(|| {
                format!(
                    "unable to remove detached head file {}",
                    detached_path.display()
                )
            })?;
        }
        Ok(())
    }

    /// The single "where am I" query: the commit HEAD currently resolves to,
    /// through either head state.
    pub fn head_commit_hash(&self) -> anyhow::Result<Digest> {
        match self.head_state()? {
            HeadState::Attached { branch } => Ok(self.branch_by_name(&branch)?.commit_hash),
            HeadState::Detached { commit, .. } => Ok(commit),
        }
    }

    /// Advance whatever HEAD points at: the active branch ref when attached,
    /// the detached pointer otherwise.
    pub fn update_head_target(&self, commit_hash: &Digest) -> anyhow::Result<()> {
        match self.head_state()? {
            HeadState::Attached { branch } => self.update_branch(&branch, commit_hash),
            HeadState::Detached { .. } => self.move_detached(commit_hash),
        }
    }

    // ---- stash head ----

    pub fn stash_head(&self) -> anyhow::Result<Option<Digest>> {
        let stash_path = self.stash_head_path();
        if !stash_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&stash_path)
            .with_context(|| format!("unable to read stash head file {}", stash_path.display()))?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(Digest::try_parse(content.to_string())?))
    }

    pub fn set_stash_head(&self, hash: Option<&Digest>) -> anyhow::Result<()> {
        let stash_path = self.stash_head_path();
        match hash {
            Some(hash) => self.write_ref_file(&stash_path, hash.as_ref()),
            None => {
                if stash_path.exists() {
                    std::fs::remove_file(&stash_path).with_context(|| {
                        format!("unable to remove stash head file {}", stash_path.display())
                    })?;
                }
                Ok(())
            }
        }
    }

    // ---- plumbing ----

    fn write_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("ref file {} has no parent directory", path.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("unable to create ref directory {}", parent.display()))?;

        std::fs::write(path, content)
            .with_context(|| format!("unable to write ref file {}", path.display()))
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_path()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("unable to remove empty branch directory {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}

/// Branch names become file paths under `refs/heads`, so the alphabet is kept
/// narrow: alphanumerics, `-`, `_`, `.` and `/` separators, no leading or
/// trailing separator, no `..`, no component starting with a dot.
pub fn is_valid_branch_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('/') || name.ends_with('/') || name.contains("..") {
        return false;
    }

    name.split('/').all(|component| {
        !component.is_empty()
            && !component.starts_with('.')
            && component
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    })
}
