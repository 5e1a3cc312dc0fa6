use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::digest::Digest;
use crate::errors::VcsError;
use std::io::Write;

impl Repository {
    /// Check out a branch or, given a commit digest, detach HEAD onto it.
    /// Refuses to run over uncommitted changes.
    pub fn switch(&self, target: &str) -> anyhow::Result<()> {
        self.ensure_clean()?;

        if self.refs().branch_exists(target) {
            return self.switch_to_branch(target);
        }
        if let Ok(hash) = Digest::try_parse(target.to_string())
            && self.database().commit_exists(&hash)
        {
            return self.switch_to_commit(&hash);
        }

        Err(VcsError::InvalidRevision(target.to_string()).into())
    }

    fn switch_to_branch(&self, name: &str) -> anyhow::Result<()> {
        if let HeadState::Detached {
            previous_branch,
            orig_head,
            ..
        } = self.refs().head_state()?
        {
            // leaving detached state puts the recorded branch back where it was
            self.refs().update_branch(&previous_branch, &orig_head)?;
            self.refs().reattach()?;
        }

        let tip = self.refs().branch_by_name(name)?.commit_hash;
        let tree_hash = self.database().load_commit(&tip)?.tree_hash().clone();

        self.refs().set_active_branch(name)?;
        self.reset_index_to(&tree_hash)?;
        self.reset_workspace_to(&tree_hash)?;

        writeln!(self.writer(), "Switched to branch '{name}'")?;
        Ok(())
    }

    fn switch_to_commit(&self, commit_hash: &Digest) -> anyhow::Result<()> {
        match self.refs().head_state()? {
            HeadState::Attached { branch } => {
                let tip = self.refs().branch_by_name(&branch)?.commit_hash;
                self.refs().detach(commit_hash, &branch, &tip)?;
            }
            HeadState::Detached {
                previous_branch,
                orig_head,
                ..
            } => {
                self.refs().detach(commit_hash, &previous_branch, &orig_head)?;
            }
        }

        let tree_hash = self.database().load_commit(commit_hash)?.tree_hash().clone();
        self.reset_index_to(&tree_hash)?;
        self.reset_workspace_to(&tree_hash)?;

        writeln!(
            self.writer(),
            "HEAD is now detached at {}",
            commit_hash.to_short()
        )?;
        Ok(())
    }
}
