use crate::areas::repository::Repository;
use crate::artifacts::diff::report::{classify_records, render_line_diff, ChangeKind};
use crate::artifacts::objects::blob::Blob;
use std::io::Write;

impl Repository {
    /// Compare two revisions (branch names or commit digests): a change list,
    /// with line hunks for every modified file.
    pub fn diff(&self, left: &str, right: &str) -> anyhow::Result<()> {
        let left_commit = self.database().load_commit(&self.resolve_revision(left)?)?;
        let right_commit = self.database().load_commit(&self.resolve_revision(right)?)?;

        let old = self.snapshots().records_at(left_commit.tree_hash())?;
        let new = self.snapshots().records_at(right_commit.tree_hash())?;

        let changes = classify_records(&old, &new);
        if changes.is_empty() {
            writeln!(self.writer(), "no differences")?;
            return Ok(());
        }

        for change in changes {
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
