//! Commit objects
//!
//! A commit ties a root tree digest to a timestamp, a single-line message and
//! the digests of its parents: none for the root commit, one for an ordinary
//! commit, two for a merge commit.
//!
//! ## File format
//!
//! Line 0: tree digest; line 1: RFC 3339 timestamp; line 2: message;
//! lines 3..: parent digests, one per line.
//!
//! The commit's own digest covers the tree digest, timestamp and message.
//! Parents are deliberately left out of the hash to stay faithful to the
//! on-disk format this engine reimplements.

use crate::artifacts::digest::Digest;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Commit {
    tree_hash: Digest,
    created_at: DateTime<Utc>,
    message: String,
    parents: Vec<Digest>,
}

impl Commit {
    pub fn tree_hash(&self) -> &Digest {
        &self.tree_hash
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parents(&self) -> &[Digest] {
        &self.parents
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn digest(&self) -> Digest {
        Digest::of_str(&format!(
            "{}{}{}",
            self.tree_hash,
            self.timestamp(),
            self.message
        ))
    }

    fn timestamp(&self) -> String {
        self.created_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    pub fn serialize(&self) -> Bytes {
        let mut out = String::new();
        out.push_str(&format!(
            "{}\n{}\n{}\n",
            self.tree_hash,
            self.timestamp(),
            self.message
        ));
        for parent in &self.parents {
            out.push_str(parent.as_ref());
            out.push('\n');
        }
        Bytes::from(out)
    }

    pub fn deserialize(data: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(data).context("commit object is not valid UTF-8")?;
        let lines = text.lines().collect::<Vec<_>>();
        if lines.len() < 3 {
            anyhow::bail!("malformed commit object: expected at least 3 lines");
        }

        let tree_hash = Digest::try_parse(lines[0].to_string())?;
        let created_at = DateTime::parse_from_rfc3339(lines[1])
            .context("malformed commit timestamp")?
            .with_timezone(&Utc);
        let message = lines[2].to_string();
        let parents = lines[3..]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Digest::try_parse(line.to_string()))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Commit::new(tree_hash, created_at, message, parents))
    }
}
