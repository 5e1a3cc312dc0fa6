use crate::areas::repository::Repository;
use chrono::SecondsFormat;
use std::collections::{HashSet, VecDeque};
use std::io::Write;

impl Repository {
    /// History from HEAD, breadth-first, each commit printed once even when
    /// merge commits make it reachable along several paths.
    pub fn log(&self) -> anyhow::Result<()> {
        let mut queue = VecDeque::from([self.refs().head_commit_hash()?]);
        let mut printed = HashSet::new();

        while let Some(hash) = queue.pop_front() {
            if !printed.insert(hash.clone()) {
                continue;
            }
            let commit = self.database().load_commit(&hash)?;

            writeln!(self.writer(), "commit {hash}")?;
            writeln!(
                self.writer(),
                "Date: {}",
                commit
                    .created_at()
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            )?;
            writeln!(self.writer(), "\n    {}\n", commit.message())?;

            queue.extend(commit.parents().iter().cloned());
        }

        Ok(())
    }
}
