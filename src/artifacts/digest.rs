//! Object digests
//!
//! Every stored object is addressed by the lowercase hex SHA-256 of its
//! content. The newtype keeps raw strings out of the object store API; the
//! only ways in are hashing actual content or parsing a full 64-character
//! digest.

use sha2::{Digest as _, Sha256};
use std::fmt;

pub const DIGEST_LENGTH: usize = 64;
pub const SHORT_DIGEST_LENGTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(String);

impl Digest {
    pub fn try_parse(value: String) -> anyhow::Result<Self> {
        if value.len() != DIGEST_LENGTH
            || !value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            anyhow::bail!("'{}' is not a valid object digest", value);
        }
        Ok(Digest(value))
    }

    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Digest(format!("{:x}", hasher.finalize()))
    }

    pub fn of_str(data: &str) -> Self {
        Self::of_bytes(data.as_bytes())
    }

    /// Abbreviated form for human-facing output.
    pub fn to_short(&self) -> &str {
        &self.0[..SHORT_DIGEST_LENGTH]
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
