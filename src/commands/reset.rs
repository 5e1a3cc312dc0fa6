use crate::areas::repository::Repository;
use crate::artifacts::digest::Digest;
use crate::errors::VcsError;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Move HEAD only.
    Soft,
    /// Move HEAD and reset the index.
    Mixed,
    /// Move HEAD and reset both the index and the working tree.
    Hard,
}

impl Repository {
    pub fn reset(&self, target: &str, mode: ResetMode) -> anyhow::Result<()> {
        let commit_hash = Digest::try_parse(target.to_string())
            .ok()
            .filter(|hash| self.database().commit_exists(hash))
            .ok_or_else(|| VcsError::CommitNotFound(target.to_string()))?;
        let commit = self.database().load_commit(&commit_hash)?;

        self.refs().update_head_target(&commit_hash)?;
        if mode != ResetMode::Soft {
            self.reset_index_to(commit.tree_hash())?;
        }
        if mode == ResetMode::Hard {
            self.reset_workspace_to(commit.tree_hash())?;
        }

        writeln!(
            self.writer(),
            "HEAD is now at {} {}",
            commit_hash.to_short(),
            commit.message()
        )?;
        Ok(())
    }
}
