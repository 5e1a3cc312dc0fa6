use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::diff::report::{classify_records, render_line_diff, ChangeKind};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::stash::StashCommit;
use chrono::Utc;
use std::io::Write;

impl Repository {
    /// Snapshot the working tree onto the stash chain and reset the working
    /// tree and index back to HEAD.
    pub fn stash_push(&self) -> anyhow::Result<()> {
        let head_hash = self.refs().head_commit_hash()?;
        let head_commit = self.database().load_commit(&head_hash)?;

        let tree_hash = self
            .snapshots()
            .from_workspace(self.workspace(), self.ignores())?;
        if &tree_hash == head_commit.tree_hash() {
            writeln!(self.writer(), "No local changes to save")?;
            return Ok(());
        }

        let label = match self.refs().head_state()? {
            HeadState::Attached { branch } => branch,
            HeadState::Detached { .. } => "detached HEAD".to_string(),
        };
        let parents = self.refs().stash_head()?.into_iter().collect();
        let stash = StashCommit::new(
            Commit::new(
                tree_hash,
                Utc::now(),
                format!(
                    "WIP on {label}: {} {}",
                    head_hash.to_short(),
                    head_commit.message()
                ),
                parents,
            ),
            head_hash,
        );

        let stash_hash = self.database().store_stash_commit(&stash)?;
        self.refs().set_stash_head(Some(&stash_hash))?;

        self.reset_index_to(head_commit.tree_hash())?;
        self.reset_workspace_to(head_commit.tree_hash())?;

        writeln!(
            self.writer(),
            "Saved working tree state ({})",
            stash_hash.to_short()
        )?;
        Ok(())
    }

    /// Restore the newest stash entry into the working tree and index, and
    /// drop it from the chain.
    pub fn stash_pop(&self) -> anyhow::Result<()> {
        let Some(top) = self.refs().stash_head()? else {
            writeln!(self.writer(), "No stash entries found.")?;
            return Ok(());
        };
        let stash = self.database().load_stash_commit(&top)?;

        self.reset_index_to(stash.commit().tree_hash())?;
        self.reset_workspace_to(stash.commit().tree_hash())?;

        self.refs().set_stash_head(stash.previous())?;
        self.database().delete_stash_commit(&top)?;

        writeln!(self.writer(), "Dropped stash ({})", top.to_short())?;
        Ok(())
    }

    /// The chain from newest to oldest, `stash@{0}` first.
    pub fn stash_list(&self) -> anyhow::Result<()> {
        let mut next = self.refs().stash_head()?;
        let mut position = 0usize;

        while let Some(hash) = next {
            let stash = self.database().load_stash_commit(&hash)?;
            writeln!(
                self.writer(),
                "stash@{{{position}}}: {}",
                stash.commit().message()
            )?;
            next = stash.previous().cloned();
            position += 1;
        }

        if position == 0 {
            writeln!(self.writer(), "No stash entries found.")?;
        }
        Ok(())
    }

    /// Diff of the newest stash entry against the commit it was taken on.
    pub fn stash_show(&self) -> anyhow::Result<()> {
        let Some(top) = self.refs().stash_head()? else {
            writeln!(self.writer(), "No stash entries found.")?;
            return Ok(());
        };
        let stash = self.database().load_stash_commit(&top)?;

        let base_commit = self.database().load_commit(stash.base_commit_hash())?;
        let old = self.snapshots().records_at(base_commit.tree_hash())?;
        let new = self.snapshots().records_at(stash.commit().tree_hash())?;

        for change in classify_records(&old, &new) {
            match change.kind {
                ChangeKind::Added => writeln!(self.writer(), "added: {}", change.path)?,
                ChangeKind::Deleted => writeln!(self.writer(), "deleted: {}", change.path)?,
                ChangeKind::Modified => {
                    writeln!(self.writer(), "modified: {}", change.path)?;

                    let old_lines =
                        Blob::new(self.database().load_blob(old[&change.path].blob_hash())?)
                            .lines();
                    let new_lines =
                        Blob::new(self.database().load_blob(new[&change.path].blob_hash())?)
                            .lines();
                    write!(self.writer(), "{}", render_line_diff(&old_lines, &new_lines))?;
                }
            }
        }

        Ok(())
    }
}
