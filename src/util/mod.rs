//! util — filesystem helpers shared by the store and the bundled snapshotter.
//!
//! Contains:
//! - remove_file_if_exists() / remove_dir_all_if_exists(): idempotent removal.
//! - write_file_atomic(): tmp + rename, optional fsync.
//! - sync_dir(): flush a directory entry (no-op where unsupported).
//! - copy_tree(): recursive copy of a file or a directory.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Remove a file; a missing file is not an error.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Remove a directory tree; a missing directory is not an error.
pub fn remove_dir_all_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Remove whatever lives at `path` (file, symlink or directory tree).
pub fn remove_any_if_exists(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.is_dir() => remove_dir_all_if_exists(path),
        Ok(_) => remove_file_if_exists(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Write `data` to `<path>.tmp`, then rename over `path`.
/// With `fsync` the file and its parent directory are flushed.
pub fn write_file_atomic(path: &Path, data: &[u8], fsync: bool) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut f = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp)?;
        f.write_all(data)?;
        f.flush()?;
        if fsync {
            f.sync_all()?;
        }
    }
    fs::rename(&tmp, path)?;
    if fsync {
        if let Some(parent) = path.parent() {
            sync_dir(parent)?;
        }
    }
    Ok(())
}

/// Flush directory metadata so that created/renamed entries survive a crash.
#[cfg(unix)]
pub fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Copy `src` to `dst`. Directories are copied recursively, symlinks are
/// recreated (unix) rather than followed. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path, fsync: bool) -> io::Result<u64> {
    let md = fs::symlink_metadata(src)?;
    if md.file_type().is_symlink() {
        copy_symlink(src, dst)?;
        return Ok(0);
    }
    if md.is_dir() {
        fs::create_dir_all(dst)?;
        let mut copied = 0u64;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copied += copy_tree(&entry.path(), &dst.join(entry.file_name()), fsync)?;
        }
        if fsync {
            sync_dir(dst)?;
        }
        return Ok(copied);
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    if fsync {
        fs::File::open(dst)?.sync_all()?;
    }
    Ok(1)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
