//! Completion marker (complete.txt).
//!
//! Presence is the only thing that matters; the content is never parsed.
//! The marker is written strictly after every other file of the snapshot is
//! on disk, and removed before anything else on delete.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SnapshotError};
use crate::util::{remove_file_if_exists, write_file_atomic};

pub const COMPLETE_FILE: &str = "complete.txt";
pub const COMPLETE_FILE_CONTENTS: &str =
    "The presence of this file indicates that this snapshot is complete and valid.";

pub fn marker_path(snapshot_dir: &Path) -> PathBuf {
    snapshot_dir.join(COMPLETE_FILE)
}

/// True when the marker exists. Any stat error counts as "not complete".
pub fn is_complete(snapshot_dir: &Path) -> bool {
    fs::metadata(marker_path(snapshot_dir)).is_ok()
}

/// Commit the snapshot. Call only after the rest of the snapshot is flushed.
pub fn write_marker(snapshot_dir: &Path, fsync: bool) -> Result<()> {
    let path = marker_path(snapshot_dir);
    write_file_atomic(&path, COMPLETE_FILE_CONTENTS.as_bytes(), fsync).map_err(|e| {
        SnapshotError::io(format!("failed to write {}", path.display()), e)
    })
}

/// Uncommit the snapshot. Absent marker is fine.
pub fn remove_marker(snapshot_dir: &Path) -> Result<()> {
    let path = marker_path(snapshot_dir);
    remove_file_if_exists(&path)
        .map_err(|e| SnapshotError::io(format!("failed to remove {COMPLETE_FILE:?}"), e))
}
