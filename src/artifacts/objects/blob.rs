use crate::artifacts::digest::Digest;
use bytes::Bytes;
use derive_new::new;

/// Raw file content, addressed by the digest of its bytes.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    data: Bytes,
}

impl Blob {
    pub fn digest(&self) -> Digest {
        Digest::of_bytes(&self.data)
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }

    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Content split into lines, the unit the diff and merge engines work on.
    pub fn lines(&self) -> Vec<String> {
        self.as_text().lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn digest_matches_raw_bytes() {
        let blob = Blob::new(Bytes::from_static(b"one\ntwo\n"));
        assert_eq!(blob.digest(), Digest::of_bytes(b"one\ntwo\n"));
    }

    #[test]
    fn lines_drop_the_trailing_newline() {
        let blob = Blob::new(Bytes::from_static(b"one\ntwo\n"));
        assert_eq!(blob.lines(), vec!["one".to_string(), "two".to_string()]);
    }
}
