use crate::areas::index::IndexRecord;
use crate::areas::repository::Repository;
use crate::artifacts::digest::Digest;
use crate::errors::VcsError;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Stage files. A directory argument stages everything under it and also
    /// stages deletions for tracked files that no longer exist on disk; a
    /// missing path that the index still tracks stages its deletion.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        for path in paths {
            let relative = normalize(path);
            let absolute = self.root().join(&relative);

            if absolute.is_dir() {
                self.add_directory(&relative)?;
            } else if absolute.is_file() {
                match self.stage_file(Path::new(&relative)) {
                    Err(err)
                        if matches!(
                            err.downcast_ref::<VcsError>(),
                            Some(VcsError::ItemAlreadyStaged(_))
                        ) =>
                    {
                        writeln!(self.writer(), "'{relative}' is already staged")?;
                    }
                    other => other?,
                }
            } else if self.index().record_by_path(&relative).is_some() {
                self.index_mut().delete_record(&relative);
            } else {
                anyhow::bail!("pathspec '{}' did not match any files", path);
            }
        }

        self.index().save()
    }

    fn add_directory(&self, relative: &str) -> anyhow::Result<()> {
        let whole_tree = relative.is_empty() || relative == ".";
        let prefix = format!("{relative}/");
        let in_scope =
            |path: &str| whole_tree || path == relative || path.starts_with(prefix.as_str());

        for file in self.workspace().list_files(self.ignores())? {
            let path = file.to_string_lossy().replace('\\', "/");
            if !in_scope(&path) {
                continue;
            }
            match self.stage_file(&file) {
                Err(err)
                    if matches!(
                        err.downcast_ref::<VcsError>(),
                        Some(VcsError::ItemAlreadyStaged(_))
                    ) => {}
                other => other?,
            }
        }

        // tracked files gone from disk become staged deletions
        let stale = self
            .index()
            .records()
            .keys()
            .filter(|path| in_scope(path.as_str()) && !self.workspace().file_exists(Path::new(path)))
            .cloned()
            .collect::<Vec<_>>();
        for path in stale {
            self.index_mut().delete_record(&path);
        }

        Ok(())
    }

    fn stage_file(&self, relative: &Path) -> anyhow::Result<()> {
        let path = relative.to_string_lossy().replace('\\', "/");
        // the index file separates path and hash with a space
        if path.contains(' ') {
            anyhow::bail!("cannot stage '{path}': paths containing spaces are not supported");
        }
        let data = self.workspace().read_file(relative)?;

        if let Some(record) = self.index().record_by_path(&path)
            && record.blob_hash() == &Digest::of_bytes(&data)
        {
            return Err(VcsError::ItemAlreadyStaged(path).into());
        }

        let blob_hash = self.database().store_blob(data)?;
        self.index_mut()
            .add_record(IndexRecord::new(path, blob_hash));
        Ok(())
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./")
        .trim_end_matches('/')
        .to_string()
}
