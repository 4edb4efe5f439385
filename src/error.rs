//! Error kinds surfaced by the snapshot core.
//!
//! Validation errors are user-correctable and carry enough context (position,
//! truncated name) to fix the input. I/O and metadata errors name the path and
//! the operation. Payload failures coming from a `Snapshotter` stay opaque
//! (`anyhow::Error`) and are wrapped with the snapshot id.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot name must not be the empty string")]
    EmptyName,

    #[error("invalid name {shown:?}: max length is {max}, {len} were specified")]
    NameTooLong { shown: String, max: usize, len: usize },

    #[error("invalid character value {value} at position {position} in name: all characters must be printable or a space")]
    InvalidCharacter { value: u32, position: usize },

    #[error("invalid name {shown:?}: must not start with a white-space character")]
    LeadingWhitespace { shown: String },

    #[error("invalid name {shown:?}: must not end with a white-space character")]
    TrailingWhitespace { shown: String },

    #[error("invalid name {name:?}: name already exists")]
    NameExists { name: String },

    #[error("can't find snapshot {name:?}")]
    NotFound { name: String },

    #[error("snapshot \"{id}\": snapshot is not complete")]
    Incomplete { id: Uuid },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse metadata {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to capture snapshot {id}: {source:#}")]
    Capture {
        id: Uuid,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to restore files of snapshot {id}: {source:#}")]
    Replay {
        id: Uuid,
        #[source]
        source: anyhow::Error,
    },

    /// A failed operation whose cleanup also failed. `primary` is the cause,
    /// `secondary` holds every cleanup failure; neither masks the other.
    #[error("{primary}{}", render_secondary(.secondary))]
    RollbackFailed {
        primary: Box<SnapshotError>,
        secondary: Vec<SnapshotError>,
    },
}

fn render_secondary(errs: &[SnapshotError]) -> String {
    let mut out = String::new();
    for e in errs {
        out.push_str("; additionally: ");
        out.push_str(&e.to_string());
    }
    out
}

impl SnapshotError {
    /// Wrap an `io::Error` with a description of the failed operation.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        SnapshotError::Io {
            context: context.into(),
            source,
        }
    }

    /// Combine a primary failure with cleanup failures. With no cleanup
    /// failures the primary error is returned unchanged.
    pub fn with_secondary(primary: SnapshotError, secondary: Vec<SnapshotError>) -> Self {
        if secondary.is_empty() {
            return primary;
        }
        SnapshotError::RollbackFailed {
            primary: Box::new(primary),
            secondary,
        }
    }

    /// The underlying cause, looking through `RollbackFailed`.
    pub fn primary(&self) -> &SnapshotError {
        match self {
            SnapshotError::RollbackFailed { primary, .. } => primary.primary(),
            other => other,
        }
    }

    pub fn is_name_exists(&self) -> bool {
        matches!(self.primary(), SnapshotError::NameExists { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.primary(), SnapshotError::NotFound { .. })
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self.primary(), SnapshotError::Incomplete { .. })
    }

    /// True for every user-correctable name error, duplicate names included.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.primary(),
            SnapshotError::EmptyName
                | SnapshotError::NameTooLong { .. }
                | SnapshotError::InvalidCharacter { .. }
                | SnapshotError::LeadingWhitespace { .. }
                | SnapshotError::TrailingWhitespace { .. }
                | SnapshotError::NameExists { .. }
        )
    }
}
