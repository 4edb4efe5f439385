//! Snapshot lifecycle manager: create/list/delete/restore + name lookup.
//!
//! The manager holds no state besides the store root and a Snapshotter; all
//! durable state lives on disk. Completeness is decided by the marker alone:
//! - create: the Snapshotter writes the marker last; on failure the snapshot
//!   directory is removed (best-effort) and cleanup failures are reported
//!   alongside the cause.
//! - delete: marker first, then the directory.
//! - restore: refused without the marker.
//!
//! No locking against concurrent writers on the same store.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Result, SnapshotError};
use crate::snapshotter::Snapshotter;
use crate::util::remove_dir_all_if_exists;

use super::marker::{is_complete, remove_marker};
use super::metadata::read_metadata;
use super::name::check_syntax;
use super::{snapshot_dir, Snapshot};

pub struct Manager<S> {
    root: PathBuf,
    snapshotter: S,
}

impl<S: Snapshotter> Manager<S> {
    /// Bind a manager to a pre-resolved store root.
    pub fn new(root: impl Into<PathBuf>, snapshotter: S) -> Self {
        Self {
            root: root.into(),
            snapshotter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshotter(&self) -> &S {
        &self.snapshotter
    }

    /// Validate a user-supplied name: syntax first, then uniqueness against
    /// complete snapshots. Costs a full `list(false)`.
    pub fn validate_name(&self, name: &str) -> Result<()> {
        check_syntax(name)?;
        let current = self.list(false)?;
        if current.iter().any(|s| s.name == name) {
            return Err(SnapshotError::NameExists {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Capture a new snapshot. The name is trusted; call `validate_name` first.
    pub fn create(&self, name: &str, description: &str) -> Result<Snapshot> {
        let snapshot = Snapshot::new(name, description);
        let dir = snapshot.dir(&self.root);
        debug!("snapshot create: id={} name={:?}", snapshot.id, snapshot.name);

        if let Err(source) = self.snapshotter.create_files(&snapshot) {
            let primary = SnapshotError::Capture {
                id: snapshot.id,
                source,
            };
            debug!("snapshot create: rolling back {}", dir.display());
            let secondary = match remove_dir_all_if_exists(&dir) {
                Ok(()) => Vec::new(),
                Err(e) => vec![SnapshotError::io(
                    format!(
                        "failed to delete created snapshot directory {}",
                        dir.display()
                    ),
                    e,
                )],
            };
            return Err(SnapshotError::with_secondary(primary, secondary));
        }

        debug!("snapshot create: id={} complete", snapshot.id);
        Ok(snapshot)
    }

    /// Snapshots present in the store, in directory enumeration order.
    /// Entries whose names are not UUIDs are ignored; unreadable metadata
    /// fails the whole listing. A missing store root means no snapshots.
    pub fn list(&self, include_incomplete: bool) -> Result<Vec<Snapshot>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SnapshotError::io(
                    format!("failed to read snapshots directory {}", self.root.display()),
                    e,
                ))
            }
        };

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SnapshotError::io(
                    format!("failed to read snapshots directory {}", self.root.display()),
                    e,
                )
            })?;
            let file_name = entry.file_name();
            let is_id = file_name
                .to_str()
                .map(|s| Uuid::parse_str(s).is_ok())
                .unwrap_or(false);
            if !is_id {
                continue;
            }

            let dir = entry.path();
            let snapshot = read_metadata(&dir)?;
            if !include_incomplete && !is_complete(&dir) {
                debug!("snapshot list: skip incomplete {}", dir.display());
                continue;
            }
            out.push(snapshot);
        }
        Ok(out)
    }

    /// Remove a snapshot. Marker goes first so an interrupted delete never
    /// leaves a directory that still looks complete. Deleting a snapshot that
    /// does not exist succeeds.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let dir = snapshot_dir(&self.root, &id);
        debug!("snapshot delete: {}", dir.display());
        remove_marker(&dir)?;
        remove_dir_all_if_exists(&dir).map_err(|e| {
            SnapshotError::io(format!("failed to remove dir {}", dir.display()), e)
        })
    }

    /// Replay a complete snapshot onto the live state. No rollback of a
    /// partial replay is attempted here.
    pub fn restore(&self, id: Uuid) -> Result<()> {
        let dir = snapshot_dir(&self.root, &id);
        if !is_complete(&dir) {
            return Err(SnapshotError::Incomplete { id });
        }
        let snapshot = read_metadata(&dir)?;
        debug!("snapshot restore: id={} name={:?}", snapshot.id, snapshot.name);
        self.snapshotter
            .restore_files(&snapshot)
            .map_err(|source| SnapshotError::Replay { id, source })
    }

    /// Id of the first complete snapshot named exactly `name`.
    pub fn get_snapshot_id(&self, name: &str) -> Result<Uuid> {
        self.list(false)?
            .into_iter()
            .find(|s| s.name == name)
            .map(|s| s.id)
            .ok_or_else(|| SnapshotError::NotFound {
                name: name.to_string(),
            })
    }
}
