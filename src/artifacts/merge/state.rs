//! Merge progress marker
//!
//! A conflicted merge leaves a two-line MERGE_HEAD file behind: the active
//! branch's tip and the merged branch's tip. The file's existence *is* the
//! conflict state; committing while it exists produces a merge commit with
//! both recorded tips as parents and removes the file.

use crate::artifacts::digest::Digest;
use anyhow::Context;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeState {
    Clean,
    Conflict { left: Digest, right: Digest },
}

impl MergeState {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(MergeState::Clean);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read merge marker {}", path.display()))?;
        let mut lines = content.lines();
        let left = Digest::try_parse(
            lines
                .next()
                .context("malformed merge marker: missing left tip")?
                .to_string(),
        )?;
        let right = Digest::try_parse(
            lines
                .next()
                .context("malformed merge marker: missing right tip")?
                .to_string(),
        )?;

        Ok(MergeState::Conflict { left, right })
    }

    pub fn persist(&self, path: &Path) -> anyhow::Result<()> {
        match self {
            MergeState::Clean => {
                if path.exists() {
                    std::fs::remove_file(path).with_context(|| {
                        format!("unable to remove merge marker {}", path.display())
                    })?;
                }
                Ok(())
            }
            MergeState::Conflict { left, right } => std::fs::write(path, format!("{left}\n{right}\n"))
                .with_context(|| format!("unable to write merge marker {}", path.display())),
        }
    }
}
