//! Centralized configuration for snapkeep.
//!
//! - SnapConfig::from_env() reads SNAPKEEP_* variables.
//! - Fluent with_* setters override single fields (CLI flags use them).
//!
//! Variables:
//! - SNAPKEEP_SNAPSHOTS_DIR: snapshot store root (default ./snapshots)
//! - SNAPKEEP_STATE_PATHS: live state files/dirs, platform path-list syntax
//!   (':' on unix, ';' on windows)
//! - SNAPKEEP_FSYNC: 0|1|true|false|on|off|yes|no (default true)

use std::fmt;
use std::path::PathBuf;

pub const ENV_SNAPSHOTS_DIR: &str = "SNAPKEEP_SNAPSHOTS_DIR";
pub const ENV_STATE_PATHS: &str = "SNAPKEEP_STATE_PATHS";
pub const ENV_FSYNC: &str = "SNAPKEEP_FSYNC";

/// Top-level configuration shared by the CLI and the bundled snapshotter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapConfig {
    /// Snapshot store root: one subdirectory per snapshot.
    pub snapshots_dir: PathBuf,

    /// Live state captured by FileSnapshotter, in capture order.
    pub state_paths: Vec<PathBuf>,

    /// Flush files and directories before the completion marker is written.
    pub fsync: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snapshots_dir: PathBuf::from("snapshots"),
            state_paths: Vec::new(),
            fsync: true,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl SnapConfig {
    /// Defaults overridden by whatever SNAPKEEP_* variables are set.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_SNAPSHOTS_DIR) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.snapshots_dir = PathBuf::from(s);
            }
        }

        if let Some(v) = std::env::var_os(ENV_STATE_PATHS) {
            cfg.state_paths = std::env::split_paths(&v)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }

        if let Ok(v) = std::env::var(ENV_FSYNC) {
            if let Some(b) = parse_bool(&v) {
                cfg.fsync = b;
            }
        }

        cfg
    }

    pub fn with_snapshots_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.snapshots_dir = dir.into();
        self
    }

    /// Replace the state path list (an empty list keeps the current one).
    pub fn with_state_paths(mut self, paths: Vec<PathBuf>) -> Self {
        if !paths.is_empty() {
            self.state_paths = paths;
        }
        self
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for SnapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<String> = self
            .state_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        write!(
            f,
            "SnapConfig {{ snapshots_dir: {}, state_paths: [{}], fsync: {} }}",
            self.snapshots_dir.display(),
            paths.join(", "),
            self.fsync,
        )
    }
}
