//! SHA-256 digests of generated files, in `sha256sum` text form

use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 digest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Digest of `content`
    pub fn of(content: impl AsRef<[u8]>) -> Self {
        Self(format!("{:x}", Sha256::digest(content.as_ref())))
    }

    /// Parse a hex digest; anything but 64 hex digits is rejected
    pub fn parse_hex(hex: &str) -> Option<Self> {
        (hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .then(|| Self(hex.to_ascii_lowercase()))
    }

    /// Parse one `<digest>  <file>` line. A `*` before the file name
    /// (binary mode) is accepted.
    pub fn parse_line(line: &str) -> Option<(Self, &str)> {
        let (hex, rest) = line.trim_end().split_once(' ')?;
        let file = rest.trim_start_matches(' ').trim_start_matches('*');
        if file.is_empty() {
            return None;
        }
        Some((Self::parse_hex(hex)?, file))
    }

    /// Render a manifest line for `file`
    pub fn line(&self, file: &str) -> String {
        format!("{}  {}\n", self.0, file)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `content` hashes to this digest
    pub fn verify(&self, content: impl AsRef<[u8]>) -> bool {
        Self::of(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
