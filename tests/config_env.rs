use std::path::PathBuf;

use snapkeep::config::{SnapConfig, ENV_FSYNC, ENV_SNAPSHOTS_DIR, ENV_STATE_PATHS};

// Single test in this binary: it mutates process-wide env.
#[test]
fn from_env_then_builder_overrides() {
    let paths = std::env::join_paths([PathBuf::from("/srv/app/settings.json"), PathBuf::from("/srv/app/data")])
        .expect("join paths");
    std::env::set_var(ENV_SNAPSHOTS_DIR, " /srv/app/snapshots ");
    std::env::set_var(ENV_STATE_PATHS, &paths);
    std::env::set_var(ENV_FSYNC, "off");

    let cfg = SnapConfig::from_env();
    assert_eq!(cfg.snapshots_dir, PathBuf::from("/srv/app/snapshots"));
    assert_eq!(
        cfg.state_paths,
        vec![PathBuf::from("/srv/app/settings.json"), PathBuf::from("/srv/app/data")]
    );
    assert!(!cfg.fsync);

    // garbage is ignored, default stays
    std::env::set_var(ENV_FSYNC, "sometimes");
    assert!(SnapConfig::from_env().fsync);

    let cfg = SnapConfig::from_env()
        .with_snapshots_dir("/elsewhere")
        .with_fsync(false)
        .build();
    assert_eq!(cfg.snapshots_dir, PathBuf::from("/elsewhere"));
    assert_eq!(cfg.state_paths.len(), 2);
    assert!(!cfg.fsync);

    std::env::remove_var(ENV_SNAPSHOTS_DIR);
    std::env::remove_var(ENV_STATE_PATHS);
    std::env::remove_var(ENV_FSYNC);
    assert_eq!(SnapConfig::from_env(), SnapConfig::default());
}
