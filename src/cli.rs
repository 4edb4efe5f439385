use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use std::path::PathBuf;

use crate::config::SnapConfig;
use crate::snapshot::{Manager, Snapshot};
use crate::snapshotter::FileSnapshotter;

/// Administrative command surface for the snapshot store.
#[derive(Parser, Debug)]
#[command(
    name = "snapkeep",
    version,
    about = "Create, list, delete and restore state snapshots",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Snapshot store root (overrides SNAPKEEP_SNAPSHOTS_DIR)
    #[arg(long, global = true)]
    pub snapshots_dir: Option<PathBuf>,

    /// Live state path to capture; repeatable (overrides SNAPKEEP_STATE_PATHS)
    #[arg(long = "state-path", global = true)]
    pub state_paths: Vec<PathBuf>,

    /// Skip fsync before the completion marker (faster, not crash-safe)
    #[arg(long, global = true, default_value_t = false)]
    pub no_fsync: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Capture the current state under a new, unique name
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List snapshots (complete only, unless --all)
    List {
        /// Include snapshots that are being created/deleted or failed
        #[arg(long, default_value_t = false)]
        all: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Delete a snapshot by name
    Delete {
        name: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Restore the live state from a snapshot by name
    Restore {
        name: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Check whether a name can be used for a new snapshot
    Validate {
        name: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Cmd {
    /// Whether `--json` was given. A failed JSON command has already printed
    /// its error, so the caller must not report it again.
    pub fn json(&self) -> bool {
        match self {
            Cmd::Create { json, .. }
            | Cmd::List { json, .. }
            | Cmd::Delete { json, .. }
            | Cmd::Restore { json, .. }
            | Cmd::Validate { json, .. } => *json,
        }
    }
}

/// Run an already parsed command line. With `--json`, a failure is printed
/// to stdout as `{"error": "..."}` before it is returned.
pub fn run_with(cli: Cli) -> Result<()> {
    let mut cfg = SnapConfig::from_env().with_state_paths(cli.state_paths.clone());
    if let Some(dir) = &cli.snapshots_dir {
        cfg = cfg.with_snapshots_dir(dir.clone());
    }
    if cli.no_fsync {
        cfg = cfg.with_fsync(false);
    }
    let cfg = cfg.build();

    let json = cli.cmd.json();
    let res = dispatch(&cfg, cli.cmd);
    if json {
        if let Err(e) = &res {
            println!("{}", json!({ "error": format!("{:#}", e) }));
        }
    }
    res
}

fn dispatch(cfg: &SnapConfig, cmd: Cmd) -> Result<()> {
    match cmd {
        Cmd::Create { name, description, json } => exec_create(cfg, &name, &description, json),
        Cmd::List { all, json } => exec_list(cfg, all, json),
        Cmd::Delete { name, json } => exec_delete(cfg, &name, json),
        Cmd::Restore { name, json } => exec_restore(cfg, &name, json),
        Cmd::Validate { name, json } => exec_validate(cfg, &name, json),
    }
}

fn manager(cfg: &SnapConfig) -> Manager<FileSnapshotter> {
    Manager::new(cfg.snapshots_dir.clone(), FileSnapshotter::from_config(cfg))
}

pub fn exec_create(cfg: &SnapConfig, name: &str, description: &str, json: bool) -> Result<()> {
    let m = manager(cfg);
    // Create itself trusts its input.
    m.validate_name(name)?;
    let snap = m
        .create(name, description)
        .with_context(|| format!("failed to create snapshot {name:?}"))?;
    info!("created snapshot {} ({:?})", snap.id, snap.name);
    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        println!("snapshot: id={} name={:?}", snap.id, snap.name);
    }
    Ok(())
}

pub fn exec_list(cfg: &SnapConfig, all: bool, json: bool) -> Result<()> {
    let mut snaps = manager(cfg)
        .list(all)
        .with_context(|| format!("list snapshots at {}", cfg.snapshots_dir.display()))?;
    sort_for_display(&mut snaps);
    if json {
        println!("{}", serde_json::to_string_pretty(&snaps)?);
    } else {
        print!("{}", render_table(&snaps));
    }
    Ok(())
}

pub fn exec_delete(cfg: &SnapConfig, name: &str, json: bool) -> Result<()> {
    let m = manager(cfg);
    let id = m.get_snapshot_id(name)?;
    m.delete(id).context("failed to delete snapshot")?;
    info!("deleted snapshot {} ({:?})", id, name);
    if json {
        println!("{}", json!({ "deleted": { "id": id, "name": name } }));
    } else {
        println!("snapshot-delete: OK (name={name:?}, id={id})");
    }
    Ok(())
}

pub fn exec_restore(cfg: &SnapConfig, name: &str, json: bool) -> Result<()> {
    let m = manager(cfg);
    let id = m.get_snapshot_id(name)?;
    m.restore(id)
        .with_context(|| format!("failed to restore snapshot {name:?}"))?;
    info!("restored snapshot {} ({:?})", id, name);
    if json {
        println!("{}", json!({ "restored": { "id": id, "name": name } }));
    } else {
        println!("snapshot-restore: OK (name={name:?}, id={id})");
    }
    Ok(())
}

pub fn exec_validate(cfg: &SnapConfig, name: &str, json: bool) -> Result<()> {
    manager(cfg).validate_name(name)?;
    if json {
        println!("{}", json!({ "valid": true, "name": name }));
    } else {
        println!("name {name:?} is available");
    }
    Ok(())
}

// ------------- helpers -------------

/// Stable presentation order: oldest first, then by name.
pub fn sort_for_display(snaps: &mut [Snapshot]) {
    snaps.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.name.cmp(&b.name)));
}

pub fn render_table(snaps: &[Snapshot]) -> String {
    if snaps.is_empty() {
        return "(no snapshots)\n".to_string();
    }
    let width = snaps
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let mut out = format!("{:<36}  {:<width$}  {:<19}  DESCRIPTION\n", "ID", "NAME", "CREATED");
    for s in snaps {
        out.push_str(&format!(
            "{:<36}  {:<width$}  {:<19}  {}\n",
            s.id.to_string(),
            s.name,
            s.created.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.description
        ));
    }
    out
}
