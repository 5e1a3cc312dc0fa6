//! Stashed snapshots
//!
//! A stash entry is a commit whose parent link chains it to the previous stash
//! entry, plus the digest of the commit the snapshot was taken on top of. The
//! newest entry's digest lives in the STASH_HEAD file; popping follows the
//! parent link.
//!
//! ## File format
//!
//! The commit format with one extra trailing line holding the base commit
//! digest.

use crate::artifacts::digest::Digest;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StashCommit {
    commit: Commit,
    base_commit_hash: Digest,
}

impl StashCommit {
    pub fn commit(&self) -> &Commit {
        &self.commit
    }

    pub fn base_commit_hash(&self) -> &Digest {
        &self.base_commit_hash
    }

    pub fn digest(&self) -> Digest {
        self.commit.digest()
    }

    /// The next entry down the stash chain, if any.
    pub fn previous(&self) -> Option<&Digest> {
        self.commit.parents().first()
    }

    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut text = String::from_utf8(self.commit.serialize().to_vec())
            .context("stash commit is not valid UTF-8")?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(self.base_commit_hash.as_ref());
        text.push('\n');
        Ok(Bytes::from(text))
    }

    pub fn deserialize(data: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(data).context("stash commit is not valid UTF-8")?;
        let lines = text.lines().collect::<Vec<_>>();
        let (base_line, commit_lines) = lines
            .split_last()
            .context("malformed stash commit: empty file")?;

        let base_commit_hash = Digest::try_parse(base_line.to_string())?;
        let commit = Commit::deserialize(commit_lines.join("\n").as_bytes())?;

        Ok(StashCommit::new(commit, base_commit_hash))
    }
}
