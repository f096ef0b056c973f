//! 命令行工具测试

use std::fs;

use assert_cmd::Command;

fn lookup() -> Command {
    let mut cmd = Command::cargo_bin("resource-lookup").unwrap();
    cmd.env_remove("RESOURCE_MESSAGE_SOURCE")
        .env_remove("RESOURCE_BUNDLE_DIR")
        .env_remove("RESOURCE_MAPPING_FILE")
        .env_remove("RESOURCE_LOCALE")
        .env_remove("RESOURCE_SITE_ID");
    cmd
}

#[test]
fn test_resolves_key_from_bundle_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("message.properties"), "title=Title\n").unwrap();
    fs::write(dir.path().join("message_de.properties"), "title=Titel\n").unwrap();

    let out = lookup()
        .current_dir(dir.path())
        .arg("--bundle-dir")
        .arg(dir.path())
        .args(["--locale", "de_DE", "title"])
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "Titel\n");
}

#[test]
fn test_formats_positional_arguments() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("message.properties"), "greeting=Hello {0}, {1}\n").unwrap();

    let out = lookup()
        .current_dir(dir.path())
        .arg("--bundle-dir")
        .arg(dir.path())
        .args(["greeting", "Alice", "welcome"])
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "Hello Alice, welcome\n");
}

#[test]
fn test_missing_key_prints_default() {
    let dir = tempfile::tempdir().unwrap();

    let out = lookup()
        .current_dir(dir.path())
        .args(["--default", "Fallback Text", "missing.key"])
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "Fallback Text\n");
}

#[test]
fn test_missing_bundle_dir_fails() {
    let dir = tempfile::tempdir().unwrap();

    let out = lookup()
        .current_dir(dir.path())
        .arg("--bundle-dir")
        .arg(dir.path().join("absent"))
        .arg("title")
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error"));
}

#[test]
fn test_env_docs_without_key() {
    let out = lookup().arg("--env-docs").output().unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("RESOURCE_MESSAGE_SOURCE"));
    assert!(stdout.contains("RESOURCE_CACHE_CAPACITY"));
}

#[test]
fn test_missing_key_is_rejected() {
    let out = lookup().output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_cli_source_applied_before_validation() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("message.properties"), "title=Title\n").unwrap();
    let config = dir.path().join("resource-config.toml");
    fs::write(&config, "cache_capacity = 0\n").unwrap();

    let out = lookup()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("--bundle-dir")
        .arg(dir.path())
        .args(["--source", "system", "title"])
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "Title\n");

    let out = lookup()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("title")
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("缓存容量"));
}
