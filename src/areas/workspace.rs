//! Working directory access
//!
//! All paths handed in and out are repository-relative with forward slashes;
//! the workspace joins them onto the repository root. Listing applies the
//! ignore rules, so the `.vit` metadata directory never leaks into snapshots.

use crate::areas::ignore::IgnoreRules;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All non-ignored files under the root, relative paths in name order.
    pub fn list_files(&self, ignores: &IgnoreRules) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .filter(|relative| !ignores.is_ignored(relative))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    pub fn file_exists(&self, relative_path: &Path) -> bool {
        self.path.join(relative_path).is_file()
    }

    pub fn read_file(&self, relative_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(relative_path);
        let content = std::fs::read(&file_path)
            .with_context(|| format!("unable to read file {}", file_path.display()))?;
        Ok(content.into())
    }

    pub fn write_file(&self, relative_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let file_path = self.path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("unable to create directory {}", parent.display()))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("unable to open file {}", file_path.display()))?;
        file.write_all(data)
            .with_context(|| format!("unable to write file {}", file_path.display()))
    }

    pub fn delete_file(&self, relative_path: &Path) -> anyhow::Result<()> {
        let file_path = self.path.join(relative_path);
        std::fs::remove_file(&file_path)
            .with_context(|| format!("unable to delete file {}", file_path.display()))?;
        self.prune_empty_parent_dirs(&file_path)
    }

    /// Delete every non-ignored file. The destructive half of a workspace
    /// reset; callers gate it behind the clean-index check.
    pub fn clear(&self, ignores: &IgnoreRules) -> anyhow::Result<()> {
        for relative in self.list_files(ignores)? {
            self.delete_file(&relative)?;
        }
        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.exists()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("unable to remove empty directory {}", parent.display()))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}
