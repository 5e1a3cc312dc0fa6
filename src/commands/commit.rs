use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::merge::state::MergeState;
use crate::artifacts::objects::commit::Commit;
use chrono::Utc;
use std::io::Write;

impl Repository {
    /// Commit the index. During a conflicted merge the new commit carries the
    /// two recorded tips as parents and clears the merge marker.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let merge_state = self.merge_state()?;
        let tree_hash = self.snapshots().build(self.index().records())?;

        let parents = match &merge_state {
            MergeState::Conflict { left, right } => vec![left.clone(), right.clone()],
            MergeState::Clean => {
                if tree_hash == self.head_tree_hash()? {
                    writeln!(self.writer(), "nothing to commit, working tree clean")?;
                    return Ok(());
                }
                vec![self.refs().head_commit_hash()?]
            }
        };

        // messages are single-line on disk
        let message = message.replace('\n', " ").trim().to_string();

        let commit = Commit::new(tree_hash, Utc::now(), message, parents);
        let commit_hash = self.database().store_commit(&commit)?;
        self.refs().update_head_target(&commit_hash)?;
        self.set_merge_state(&MergeState::Clean)?;

        let label = match self.refs().head_state()? {
            HeadState::Attached { branch } => branch,
            HeadState::Detached { .. } => "detached HEAD".to_string(),
        };
        writeln!(
            self.writer(),
            "[{label} {}] {}",
            commit_hash.to_short(),
            commit.message()
        )?;
        Ok(())
    }
}
