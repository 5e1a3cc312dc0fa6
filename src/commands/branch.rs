use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchAction {
    List,
    Show,
    Create(String),
    Delete(String),
}

impl Repository {
    pub fn branch(&self, action: BranchAction) -> anyhow::Result<()> {
        match action {
            BranchAction::List => self.list_branches(),
            BranchAction::Show => self.show_active_branch(),
            BranchAction::Create(name) => self.create_branch(&name),
            BranchAction::Delete(name) => self.delete_branch(&name),
        }
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let head_state = self.refs().head_state()?;
        if let HeadState::Detached { commit, .. } = &head_state {
            writeln!(
                self.writer(),
                "* (HEAD detached at {})",
                commit.to_short()
            )?;
        }

        for branch in self.refs().all_branches()? {
            let marker = match &head_state {
                HeadState::Attached { branch: active } if active == &branch.name => "*",
                _ => " ",
            };
            writeln!(self.writer(), "{marker} {}", branch.name)?;
        }
        Ok(())
    }

    fn show_active_branch(&self) -> anyhow::Result<()> {
        match self.refs().head_state()? {
            HeadState::Attached { branch } => writeln!(self.writer(), "{branch}")?,
            HeadState::Detached { commit, .. } => {
                writeln!(self.writer(), "(HEAD detached at {})", commit.to_short())?;
            }
        }
        Ok(())
    }

    fn create_branch(&self, name: &str) -> anyhow::Result<()> {
        let tip = self.refs().head_commit_hash()?;
        self.refs().create_branch(name, &tip)?;
        writeln!(self.writer(), "Created branch '{name}'")?;
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> anyhow::Result<()> {
        if let HeadState::Attached { branch } = self.refs().head_state()?
            && branch == name
        {
            anyhow::bail!("cannot delete the active branch '{}'", name);
        }

        let tip = self.refs().branch_by_name(name)?.commit_hash;
        self.refs().delete_branch(name)?;
        writeln!(
            self.writer(),
            "Deleted branch {name} (was {})",
            tip.to_short()
        )?;
        Ok(())
    }
}
