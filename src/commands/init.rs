use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use chrono::Utc;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    /// Lay down the `.vit` skeleton: an empty index, an empty-tree root
    /// commit, and a default branch pointing at it.
    pub fn init(&self) -> anyhow::Result<()> {
        if self.refs().is_initialized() {
            writeln!(
                self.writer(),
                "Reinitialized existing vit repository in {}",
                self.metadata_path().display()
            )?;
            return Ok(());
        }

        std::fs::create_dir_all(self.refs().heads_path())?;
        self.index().save()?;

        let root_tree = self.snapshots().build(&BTreeMap::new())?;
        let root_commit = Commit::new(root_tree, Utc::now(), "root commit".to_string(), vec![]);
        let commit_hash = self.database().store_commit(&root_commit)?;

        self.refs().create_branch(DEFAULT_BRANCH, &commit_hash)?;
        self.refs().set_active_branch(DEFAULT_BRANCH)?;

        writeln!(
            self.writer(),
            "Initialized empty vit repository in {}",
            self.metadata_path().display()
        )?;
        Ok(())
    }
}
