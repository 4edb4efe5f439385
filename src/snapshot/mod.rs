//! Snapshot store: one directory per snapshot under the store root.
//!
//! Layout of `<root>/<id>/`:
//! - metadata.json: the `Snapshot` record (pretty JSON, stable field names).
//! - complete.txt: completion marker; its presence alone makes a snapshot
//!   restorable and visible in default listings.
//! - anything else belongs to the `Snapshotter`.
//!
//! Submodules:
//! - name.rs: syntactic name rules.
//! - metadata.rs: metadata.json read/write.
//! - marker.rs: completion marker.
//! - manager.rs: lifecycle (create/list/delete/restore, name lookup).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub mod marker;
pub mod metadata;
pub mod name;

mod manager;

pub use manager::Manager;

/// A captured, named point-in-time copy of application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "Created")]
    pub created: DateTime<Local>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Description")]
    pub description: String,
}

impl Snapshot {
    /// New record with a fresh random id, stamped now.
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            created: Local::now(),
            name: name.to_string(),
            id: Uuid::new_v4(),
            description: description.to_string(),
        }
    }

    /// Directory of this snapshot inside the store rooted at `root`.
    pub fn dir(&self, root: &Path) -> PathBuf {
        snapshot_dir(root, &self.id)
    }
}

/// `<root>/<id>` with the id in canonical hyphenated form.
pub fn snapshot_dir(root: &Path, id: &Uuid) -> PathBuf {
    root.join(id.hyphenated().to_string())
}
