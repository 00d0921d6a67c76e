//! Generation Manifest
//!
//! Records the checksum of every per-type file at the time it was generated,
//! in `checksums.sha256` (`<sha256>  <file name>` per line). The
//! overwrite-if-unmodified policy compares against it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::checksum::Checksum;
use crate::document::write_atomic;
use crate::error::Result;

/// File name of the manifest inside an output directory
pub const MANIFEST_FILE: &str = "checksums.sha256";

/// Checksums of generated files, keyed by file name
#[derive(Debug, Default)]
pub struct GenerationManifest {
    path: PathBuf,
    entries: BTreeMap<String, Checksum>,
}

impl GenerationManifest {
    /// Load the manifest of an output directory (empty when absent)
    pub fn load(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(MANIFEST_FILE);
        let mut entries = BTreeMap::new();
        if path.is_file() {
            for line in fs::read_to_string(&path)?.lines() {
                match Checksum::parse_line(line) {
                    Some((checksum, file)) => {
                        entries.insert(file.to_string(), checksum);
                    }
                    None if line.trim().is_empty() => {}
                    None => {
                        debug!(manifest = %path.display(), line, "malformed checksum line skipped")
                    }
                }
            }
        }
        Ok(Self { path, entries })
    }

    /// Checksum recorded for a file at its last generation
    pub fn get(&self, file_name: &str) -> Option<&Checksum> {
        self.entries.get(file_name)
    }

    /// Record the checksum of freshly generated content
    pub fn record(&mut self, file_name: impl Into<String>, content: &str) {
        self.entries.insert(file_name.into(), Checksum::of(content));
    }

    /// True when no file has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the manifest back next to the generated files
    pub fn save(&self) -> Result<()> {
        let content: String = self
            .entries
            .iter()
            .map(|(file, checksum)| checksum.line(file))
            .collect();
        write_atomic(&self.path, content.as_bytes())
    }
}
