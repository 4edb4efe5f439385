//! FileSnapshotter — copy-based capture/replay of a fixed list of state paths.
//!
//! Snapshot directory layout produced by create_files():
//!   <root>/<id>/metadata.json
//!   <root>/<id>/files/<index>-<basename>   (one per captured state path)
//!   <root>/<id>/files.json                 (capture manifest, see CapturedPath)
//!   <root>/<id>/complete.txt               (written last)
//!
//! A state path that does not exist at capture time is recorded as absent;
//! restoring such an entry removes the live path again.

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::SnapConfig;
use crate::snapshot::marker::write_marker;
use crate::snapshot::metadata::write_metadata;
use crate::snapshot::Snapshot;
use crate::util::{copy_tree, remove_any_if_exists, sync_dir, write_file_atomic};

use super::Snapshotter;

pub const FILES_DIR: &str = "files";
pub const FILES_MANIFEST: &str = "files.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Dir,
    Symlink,
    Absent,
}

/// One captured state path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPath {
    /// Live location the state was copied from (and is restored to).
    pub source: PathBuf,
    /// Entry name under `files/`; empty for absent paths.
    pub stored: String,
    pub kind: PathKind,
}

#[derive(Debug, Serialize, Deserialize)]
struct FilesManifest {
    entries: Vec<CapturedPath>,
}

#[derive(Debug, Clone)]
pub struct FileSnapshotter {
    snapshots_dir: PathBuf,
    state_paths: Vec<PathBuf>,
    fsync: bool,
}

impl FileSnapshotter {
    pub fn new(snapshots_dir: impl Into<PathBuf>, state_paths: Vec<PathBuf>, fsync: bool) -> Self {
        Self {
            snapshots_dir: snapshots_dir.into(),
            state_paths,
            fsync,
        }
    }

    pub fn from_config(cfg: &SnapConfig) -> Self {
        Self::new(cfg.snapshots_dir.clone(), cfg.state_paths.clone(), cfg.fsync)
    }

    pub fn state_paths(&self) -> &[PathBuf] {
        &self.state_paths
    }

    /// Read the capture manifest of a snapshot.
    pub fn captured_paths(&self, snapshot: &Snapshot) -> Result<Vec<CapturedPath>> {
        let path = snapshot.dir(&self.snapshots_dir).join(FILES_MANIFEST);
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let m: FilesManifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(m.entries)
    }

    fn capture_one(&self, files_dir: &Path, index: usize, src: &Path) -> Result<CapturedPath> {
        let md = match fs::symlink_metadata(src) {
            Ok(md) => md,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("snapshot capture: state path {} does not exist, recording as absent", src.display());
                return Ok(CapturedPath {
                    source: src.to_path_buf(),
                    stored: String::new(),
                    kind: PathKind::Absent,
                });
            }
            Err(e) => return Err(e).with_context(|| format!("stat {}", src.display())),
        };
        let kind = if md.file_type().is_symlink() {
            PathKind::Symlink
        } else if md.is_dir() {
            PathKind::Dir
        } else {
            PathKind::File
        };

        let base = src
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
        let stored = format!("{index}-{base}");
        let dst = files_dir.join(&stored);
        let n = copy_tree(src, &dst, self.fsync)
            .with_context(|| format!("copy {} -> {}", src.display(), dst.display()))?;
        debug!("snapshot capture: {} ({} file(s)) -> {}", src.display(), n, stored);

        Ok(CapturedPath {
            source: src.to_path_buf(),
            stored,
            kind,
        })
    }
}

impl Snapshotter for FileSnapshotter {
    fn create_files(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = snapshot.dir(&self.snapshots_dir);
        info!(
            "snapshot capture: start, id={}, dir={}, paths={}",
            snapshot.id,
            dir.display(),
            self.state_paths.len()
        );

        write_metadata(&dir, snapshot, self.fsync)?;

        let files_dir = dir.join(FILES_DIR);
        fs::create_dir_all(&files_dir)
            .with_context(|| format!("create {}", files_dir.display()))?;

        let mut entries = Vec::with_capacity(self.state_paths.len());
        for (index, src) in self.state_paths.iter().enumerate() {
            entries.push(self.capture_one(&files_dir, index, src)?);
        }

        let manifest_path = dir.join(FILES_MANIFEST);
        let json = serde_json::to_vec_pretty(&FilesManifest { entries })
            .context("serialize files.json")?;
        write_file_atomic(&manifest_path, &json, self.fsync)
            .with_context(|| format!("write {}", manifest_path.display()))?;

        if self.fsync {
            sync_dir(&files_dir).with_context(|| format!("sync {}", files_dir.display()))?;
            sync_dir(&dir).with_context(|| format!("sync {}", dir.display()))?;
        }

        // Commit point.
        write_marker(&dir, self.fsync)?;
        info!("snapshot capture: done, id={}", snapshot.id);
        Ok(())
    }

    fn restore_files(&self, snapshot: &Snapshot) -> Result<()> {
        let files_dir = snapshot.dir(&self.snapshots_dir).join(FILES_DIR);
        let entries = self.captured_paths(snapshot)?;
        info!(
            "snapshot replay: start, id={}, entries={}",
            snapshot.id,
            entries.len()
        );

        // Every stored copy must be present before any live path is touched.
        for e in entries.iter().filter(|e| e.kind != PathKind::Absent) {
            if e.stored.is_empty() {
                return Err(anyhow!(
                    "files.json entry for {} has no stored copy",
                    e.source.display()
                ));
            }
            let src = files_dir.join(&e.stored);
            fs::symlink_metadata(&src)
                .with_context(|| format!("stored copy of {} is missing", e.source.display()))?;
        }

        for e in &entries {
            remove_any_if_exists(&e.source)
                .with_context(|| format!("remove live {}", e.source.display()))?;
            if e.kind == PathKind::Absent {
                debug!("snapshot replay: {} was absent, removed", e.source.display());
                continue;
            }
            let src = files_dir.join(&e.stored);
            copy_tree(&src, &e.source, self.fsync)
                .with_context(|| format!("copy {} -> {}", src.display(), e.source.display()))?;
            debug!("snapshot replay: {} restored", e.source.display());
        }

        info!("snapshot replay: done, id={}", snapshot.id);
        Ok(())
    }
}
