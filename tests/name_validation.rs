use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use snapkeep::snapshot::name::{MAX_NAME_LENGTH, NAME_DISPLAY_CUTOFF};
use snapkeep::{FileSnapshotter, Manager, SnapshotError};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("snapkeep-names-{prefix}-{pid}-{t}"))
}

fn manager(root: &Path) -> Manager<FileSnapshotter> {
    Manager::new(root, FileSnapshotter::new(root, Vec::new(), false))
}

fn kind(e: &SnapshotError) -> &'static str {
    match e {
        SnapshotError::EmptyName => "empty",
        SnapshotError::NameTooLong { .. } => "too-long",
        SnapshotError::InvalidCharacter { .. } => "invalid-char",
        SnapshotError::LeadingWhitespace { .. } => "leading-space",
        SnapshotError::TrailingWhitespace { .. } => "trailing-space",
        SnapshotError::NameExists { .. } => "exists",
        _ => "other",
    }
}

#[test]
fn valid_names_pass_on_empty_store() {
    let root = unique_root("valid");
    let m = manager(&root);
    let long = "n".repeat(MAX_NAME_LENGTH);
    for name in [
        "before-upgrade",
        "x",
        "spaces inside are fine",
        "ünïcödé ✓",
        "punctuation!@#$%^&*()",
        long.as_str(),
    ] {
        if let Err(e) = m.validate_name(name) {
            panic!("{name:?} must be valid: {e}");
        }
    }
    assert!(!root.exists(), "validation must not touch the store");
}

#[test]
fn each_rule_maps_to_its_error() {
    let root = unique_root("rules");
    let m = manager(&root);

    let cases: Vec<(String, &str)> = vec![
        (String::new(), "empty"),
        ("a".repeat(MAX_NAME_LENGTH + 1), "too-long"),
        ("bell\u{7}".to_string(), "invalid-char"),
        ("line\nbreak".to_string(), "invalid-char"),
        (" leading".to_string(), "leading-space"),
        ("trailing ".to_string(), "trailing-space"),
    ];

    for (name, expected) in cases {
        let err = m.validate_name(&name).unwrap_err();
        assert_eq!(kind(&err), expected, "{name:?}: unexpected {err:?}");
        assert!(err.is_validation());
        assert!(!err.is_name_exists());
    }
}

#[test]
fn messages_carry_enough_context() {
    let root = unique_root("messages");
    let m = manager(&root);

    let too_long = format!("{}{}", "h".repeat(NAME_DISPLAY_CUTOFF), "z".repeat(300));
    let msg = m.validate_name(&too_long).unwrap_err().to_string();
    assert_eq!(
        msg,
        format!(
            "invalid name \"{}…\": max length is 250, 330 were specified",
            "h".repeat(NAME_DISPLAY_CUTOFF)
        )
    );

    let msg = m.validate_name("ab\u{1b}cd").unwrap_err().to_string();
    assert_eq!(
        msg,
        "invalid character value 27 at position 2 in name: all characters must be printable or a space"
    );

    let msg = m.validate_name(" x").unwrap_err().to_string();
    assert_eq!(msg, "invalid name \" x\": must not start with a white-space character");

    let long_trailing = format!("{}{} ", "s".repeat(10), "e".repeat(40));
    let msg = m.validate_name(&long_trailing).unwrap_err().to_string();
    assert_eq!(
        msg,
        format!(
            "invalid name \"…{} \": must not end with a white-space character",
            "e".repeat(NAME_DISPLAY_CUTOFF - 1)
        )
    );
}

#[test]
fn only_complete_snapshots_claim_names() -> Result<()> {
    let root = unique_root("claims");
    let m = manager(&root);

    let s = m.create("taken", "")?;
    let err = m.validate_name("taken").unwrap_err();
    assert!(err.is_name_exists());
    assert_eq!(err.to_string(), "invalid name \"taken\": name already exists");

    // other names stay free, and comparison is exact
    m.validate_name("Taken")?;
    m.validate_name("taken2")?;

    // once the marker is gone the name is free again
    fs::remove_file(root.join(s.id.to_string()).join("complete.txt"))?;
    m.validate_name("taken")?;

    let _ = fs::remove_dir_all(&root);
    Ok(())
}
