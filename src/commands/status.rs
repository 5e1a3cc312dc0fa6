use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::digest::Digest;
use crate::artifacts::merge::state::MergeState;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Three sections: index vs HEAD (staged), working tree vs index
    /// (unstaged), and untracked files.
    pub fn status(&self) -> anyhow::Result<()> {
        match self.refs().head_state()? {
            HeadState::Attached { branch } => writeln!(self.writer(), "On branch {branch}")?,
            HeadState::Detached { commit, .. } => {
                writeln!(self.writer(), "HEAD detached at {}", commit.to_short())?;
            }
        }
        if let MergeState::Conflict { .. } = self.merge_state()? {
            writeln!(
                self.writer(),
                "You are in the middle of a merge; fix conflicts and commit the result."
            )?;
        }

        let head = self.head_records()?;
        let index = self.index();

        let mut staged = Vec::new();
        for (path, record) in index.records() {
            match head.get(path) {
                None => staged.push(format!("new file: {path}")),
                Some(head_record) if head_record.blob_hash() != record.blob_hash() => {
                    staged.push(format!("modified: {path}"));
                }
                Some(_) => {}
            }
        }
        for path in head.keys() {
            if index.record_by_path(path).is_none() {
                staged.push(format!("deleted: {path}"));
            }
        }
        staged.sort();

        let mut unstaged = Vec::new();
        for (path, record) in index.records() {
            let relative = Path::new(path);
            if !self.workspace().file_exists(relative) {
                unstaged.push(format!("deleted: {path}"));
            } else if &Digest::of_bytes(&self.workspace().read_file(relative)?)
                != record.blob_hash()
            {
                unstaged.push(format!("modified: {path}"));
            }
        }
        unstaged.sort();

        let mut untracked = Vec::new();
        for file in self.workspace().list_files(self.ignores())? {
            let path = file.to_string_lossy().replace('\\', "/");
            if index.record_by_path(&path).is_none() {
                untracked.push(path);
            }
        }

        if !staged.is_empty() {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            for line in &staged {
                writeln!(self.writer(), "  {}", line.green())?;
            }
        }
        if !unstaged.is_empty() {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            for line in &unstaged {
                writeln!(self.writer(), "  {}", line.red())?;
            }
        }
        if !untracked.is_empty() {
            writeln!(self.writer(), "\nUntracked files:")?;
            for path in &untracked {
                writeln!(self.writer(), "  {}", path.red())?;
            }
        }
        if staged.is_empty() && unstaged.is_empty() && untracked.is_empty() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }
}
