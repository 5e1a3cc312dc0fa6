use crate::areas::repository::Repository;
use crate::errors::VcsError;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Rewrite a working-tree file from its staged blob, discarding local
    /// edits to that file.
    pub fn restore(&self, path: &str) -> anyhow::Result<()> {
        let index = self.index();
        let record = index
            .record_by_path(path)
            .ok_or_else(|| VcsError::ItemNotTracked(path.to_string()))?;

        let data = self.database().load_blob(record.blob_hash())?;
        self.workspace().write_file(Path::new(path), &data)?;

        writeln!(self.writer(), "Restored '{path}'")?;
        Ok(())
    }
}
