use crate::areas::repository::Repository;
use crate::errors::VcsError;
use std::io::Write;

impl Repository {
    /// Revert a path's index record to what HEAD has: back to the committed
    /// digest when the path is tracked, dropped from the index otherwise.
    pub fn unstage(&self, path: &str) -> anyhow::Result<()> {
        let head = self.head_records()?;

        match head.get(path) {
            Some(record) => {
                self.index_mut().add_record(record.clone());
            }
            None => {
                if self.index_mut().delete_record(path).is_none() {
                    return Err(VcsError::ItemNotTracked(path.to_string()).into());
                }
            }
        }

        self.index().save()?;
        writeln!(self.writer(), "Unstaged '{path}'")?;
        Ok(())
    }
}
