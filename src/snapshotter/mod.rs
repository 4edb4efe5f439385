//! Snapshotter: the boundary between the lifecycle core and the payload.
//!
//! The core decides *when* a snapshot is captured or replayed; a Snapshotter
//! decides *what* live state is and how to copy it. Implementations:
//! - files.rs: FileSnapshotter, copies a configured list of paths.

use anyhow::Result;

use crate::snapshot::Snapshot;

mod files;

pub use files::{CapturedPath, FileSnapshotter, PathKind, FILES_DIR, FILES_MANIFEST};

pub trait Snapshotter {
    /// Capture live state into the snapshot's directory, write its metadata,
    /// and write the completion marker as the very last step.
    fn create_files(&self, snapshot: &Snapshot) -> Result<()>;

    /// Replay a previously captured snapshot onto the live state.
    fn restore_files(&self, snapshot: &Snapshot) -> Result<()>;
}

impl<S: Snapshotter + ?Sized> Snapshotter for &S {
    fn create_files(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).create_files(snapshot)
    }

    fn restore_files(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).restore_files(snapshot)
    }
}

impl<S: Snapshotter + ?Sized> Snapshotter for Box<S> {
    fn create_files(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).create_files(snapshot)
    }

    fn restore_files(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).restore_files(snapshot)
    }
}
