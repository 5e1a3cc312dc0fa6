//! Staging area
//!
//! The index maps repository-relative paths (forward slashes) to the blob
//! digest staged for them. It is persisted as a plain text file, one record
//! per line: `path blobHash`. Older revisions of the format carried a third
//! token per line; it is tolerated and ignored on read.
//!
//! Every logical command flushes the index to disk before returning, so the
//! file never lags behind the in-memory map across commands.

use crate::artifacts::digest::Digest;
use anyhow::Context;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexRecord {
    path: String,
    blob_hash: Digest,
}

impl IndexRecord {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn blob_hash(&self) -> &Digest {
        &self.blob_hash
    }
}

#[derive(Debug)]
pub struct Index {
    path: Box<Path>,
    records: BTreeMap<String, IndexRecord>,
}

impl Index {
    pub fn load(path: Box<Path>) -> anyhow::Result<Self> {
        let mut records = BTreeMap::new();

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("unable to read index file {}", path.display()))?;

            for line in content.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let mut tokens = line.split(' ');
                let record_path = tokens
                    .next()
                    .with_context(|| format!("malformed index record: {}", line))?;
                let blob_hash = tokens
                    .next()
                    .with_context(|| format!("malformed index record: {}", line))?;
                // any further tokens belong to the legacy format and are dropped

                records.insert(
                    record_path.to_string(),
                    IndexRecord::new(
                        record_path.to_string(),
                        Digest::try_parse(blob_hash.to_string())?,
                    ),
                );
            }
        }

        Ok(Index { path, records })
    }

    pub fn add_record(&mut self, record: IndexRecord) {
        self.records.insert(record.path.clone(), record);
    }

    pub fn delete_record(&mut self, path: &str) -> Option<IndexRecord> {
        self.records.remove(path)
    }

    pub fn record_by_path(&self, path: &str) -> Option<&IndexRecord> {
        self.records.get(path)
    }

    pub fn records(&self) -> &BTreeMap<String, IndexRecord> {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn replace(&mut self, records: BTreeMap<String, IndexRecord>) {
        self.records = records;
    }

    /// Whole-file rewrite of the on-disk index.
    pub fn save(&self) -> anyhow::Result<()> {
        let mut content = String::new();
        for record in self.records.values() {
            content.push_str(&format!("{} {}\n", record.path, record.blob_hash));
        }

        std::fs::write(&self.path, content)
            .with_context(|| format!("unable to write index file {}", self.path.display()))
    }
}
