//! metadata.json — one record per snapshot, stored inside its directory.
//!
//! Format (pretty JSON, 2-space indent):
//! {
//!   "Created": "2026-10-19T14:03:11.123456789+02:00",
//!   "Name": "before-upgrade",
//!   "ID": "6f1c2d4e-...",
//!   "Description": "..."
//! }
//!
//! Writes go through tmp + rename, so readers see either no file or a whole one.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SnapshotError};
use crate::util::write_file_atomic;

use super::Snapshot;

pub const METADATA_FILE: &str = "metadata.json";

pub fn metadata_path(snapshot_dir: &Path) -> PathBuf {
    snapshot_dir.join(METADATA_FILE)
}

/// Create the snapshot directory if needed and write its metadata record.
pub fn write_metadata(snapshot_dir: &Path, snapshot: &Snapshot, fsync: bool) -> Result<()> {
    fs::create_dir_all(snapshot_dir).map_err(|e| {
        SnapshotError::io(
            format!("failed to create snapshot directory {}", snapshot_dir.display()),
            e,
        )
    })?;
    let path = metadata_path(snapshot_dir);
    let mut json = serde_json::to_vec_pretty(snapshot).map_err(|e| SnapshotError::Metadata {
        path: path.clone(),
        source: e,
    })?;
    json.push(b'\n');
    write_file_atomic(&path, &json, fsync).map_err(|e| {
        SnapshotError::io(format!("failed to write metadata file {}", path.display()), e)
    })
}

/// Read and parse the metadata record. `Created` comes back in local time.
pub fn read_metadata(snapshot_dir: &Path) -> Result<Snapshot> {
    let path = metadata_path(snapshot_dir);
    let contents = fs::read(&path)
        .map_err(|e| SnapshotError::io(format!("failed to read {}", path.display()), e))?;
    let mut snapshot: Snapshot =
        serde_json::from_slice(&contents).map_err(|e| SnapshotError::Metadata {
            path: path.clone(),
            source: e,
        })?;
    snapshot.created = snapshot.created.with_timezone(&Local);
    Ok(snapshot)
}
