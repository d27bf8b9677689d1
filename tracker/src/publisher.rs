//! Writes snapshots to disk.
//!
//! The publisher is the only writer of its output file. A publish either
//! replaces the whole file or leaves the previous snapshot exactly as it was:
//! the document goes to a sibling temporary file first and is renamed over
//! the target once fully written.

use crate::error::{Result, TrackerError};
use crate::snapshot::{snapshot_to_json, Snapshot};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name used when no output path is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "villager_positions.json";

/// What a successful publish wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub path: PathBuf,
    pub records: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct SnapshotPublisher {
    output_path: PathBuf,
}

impl Default for SnapshotPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PATH)
    }
}

impl SnapshotPublisher {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Sibling path the document is staged in before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .output_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_OUTPUT_PATH));
        name.push(".tmp");
        self.output_path.with_file_name(name)
    }

    /// Replace the output file with `snapshot`.
    ///
    /// An empty snapshot is written as `[]`. On error the previous file is
    /// untouched.
    pub fn publish(&self, snapshot: &Snapshot) -> Result<PublishReport> {
        let document = snapshot_to_json(snapshot)?;
        let staging = self.staging_path();

        if let Err(err) = write_synced(&staging, &document) {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        if let Err(source) = fs::rename(&staging, &self.output_path) {
            let _ = fs::remove_file(&staging);
            return Err(TrackerError::io(&self.output_path, source));
        }

        Ok(PublishReport {
            path: self.output_path.clone(),
            records: snapshot.len(),
            bytes: document.len(),
        })
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| TrackerError::io(path, e))?;
    file.write_all(bytes).map_err(|e| TrackerError::io(path, e))?;
    file.sync_all().map_err(|e| TrackerError::io(path, e))?;
    Ok(())
}
