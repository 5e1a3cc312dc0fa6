use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::ancestor::{CommonAncestorFinder, SlimCommit};
use crate::artifacts::merge::state::MergeState;
use crate::artifacts::merge::Merger;
use crate::artifacts::objects::commit::Commit;
use crate::errors::VcsError;
use chrono::Utc;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Merge a branch into the active one. Three shapes: already up to date,
    /// fast-forward (the active tip is the common ancestor), and a real
    /// three-way merge that either commits directly or leaves conflict
    /// markers behind with MERGE_HEAD set.
    pub fn merge(&self, branch_name: &str) -> anyhow::Result<()> {
        let HeadState::Attached { branch: active } = self.refs().head_state()? else {
            return Err(VcsError::DetachedHeadMergeDisallowed.into());
        };
        self.ensure_clean()?;

        let target_tip = self.refs().branch_by_name(branch_name)?.commit_hash;
        let active_tip = self.refs().branch_by_name(&active)?.commit_hash;

        let finder = CommonAncestorFinder::new(|hash| {
            let commit = self.database().load_commit(hash)?;
            Ok(SlimCommit::new(hash.clone(), commit.parents().to_vec()))
        });
        let base = finder.find(&active_tip, &target_tip)?.ok_or_else(|| {
            anyhow::anyhow!("refusing to merge unrelated histories with '{branch_name}'")
        })?;

        if base == target_tip {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(());
        }

        let target_tree = self.database().load_commit(&target_tip)?.tree_hash().clone();
        if base == active_tip {
            // fast-forward: move the ref, no new commit
            self.refs().update_branch(&active, &target_tip)?;
            self.reset_index_to(&target_tree)?;
            self.reset_workspace_to(&target_tree)?;
            writeln!(
                self.writer(),
                "Fast-forwarded '{active}' to {}",
                target_tip.to_short()
            )?;
            return Ok(());
        }

        let base_tree = self.database().load_commit(&base)?.tree_hash().clone();
        let active_tree = self.database().load_commit(&active_tip)?.tree_hash().clone();

        let base_records = self.snapshots().records_at(&base_tree)?;
        let left_records = self.snapshots().records_at(&active_tree)?;
        let right_records = self.snapshots().records_at(&target_tree)?;

        let result = Merger::new(self.database()).merge(
            &base_records,
            &left_records,
            &right_records,
            &active,
            branch_name,
        )?;

        if result.conflict_paths.is_empty() {
            self.index_mut().replace(result.records);
            self.index().save()?;

            let tree_hash = self.snapshots().build(self.index().records())?;
            let commit = Commit::new(
                tree_hash.clone(),
                Utc::now(),
                format!("Merge branch '{branch_name}' into {active}"),
                vec![active_tip, target_tip],
            );
            let commit_hash = self.database().store_commit(&commit)?;
            self.refs().update_branch(&active, &commit_hash)?;
            self.reset_workspace_to(&tree_hash)?;

            writeln!(
                self.writer(),
                "[{active} {}] {}",
                commit_hash.to_short(),
                commit.message()
            )?;
        } else {
            // merged content (markers included) goes to the working tree
            // only; the index keeps its pre-merge records until the user
            // stages the resolution
            for (path, record) in &result.records {
                let data = self.database().load_blob(record.blob_hash())?;
                self.workspace().write_file(Path::new(path), &data)?;
            }
            self.set_merge_state(&MergeState::Conflict {
                left: active_tip,
                right: target_tip,
            })?;

            for path in &result.conflict_paths {
                writeln!(self.writer(), "CONFLICT (content): Merge conflict in {path}")?;
            }
            writeln!(
                self.writer(),
                "Automatic merge failed; fix conflicts and then commit the result."
            )?;
        }

        Ok(())
    }

    /// Throw away a conflicted merge: back to HEAD, marker removed.
    pub fn merge_abort(&self) -> anyhow::Result<()> {
        let MergeState::Conflict { .. } = self.merge_state()? else {
            anyhow::bail!("there is no merge to abort");
        };

        let tree_hash = self.head_tree_hash()?;
        self.reset_index_to(&tree_hash)?;
        self.reset_workspace_to(&tree_hash)?;
        self.set_merge_state(&MergeState::Clean)?;

        writeln!(self.writer(), "Merge aborted.")?;
        Ok(())
    }
}
