//! snapkeep — point-in-time snapshots of an application's state directory.
//!
//! A snapshot is a directory `<store>/<uuid>/` holding metadata.json, the
//! captured payload, and a completion marker written last. Only snapshots
//! with the marker are listed by default or restorable.

pub mod config;
pub mod error;
pub mod util;

pub mod snapshot;   // src/snapshot/{mod,name,metadata,marker,manager}.rs
pub mod snapshotter; // src/snapshotter/{mod,files}.rs

pub mod cli;

pub use config::SnapConfig;
pub use error::{Result, SnapshotError};
pub use snapshot::{Manager, Snapshot};
pub use snapshotter::{FileSnapshotter, Snapshotter};
