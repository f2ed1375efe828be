//! Unit tests for configuration loading and resolution
//!
//! Tests that manipulate environment variables are marked with #[serial]
//! so they run sequentially, not in parallel.

use madx_common::config::{
    load_or_default, load_toml_config, resolve_root_folder, resolve_secret, TomlConfig,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
fn test_full_toml_parses_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("madx.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/madx"

[logging]
level = "debug"

[graph]
base_url = "http://127.0.0.1:9999"
access_token = "toml-token"
page_id = "42"
request_timeout_secs = 5

[advisor]
api_key = "sk-toml"
model = "gpt-4o"

[refresher]
enabled = false
interval_secs = 60
include_insights = true

[traversal]
concurrency = 8
deadline_secs = 0
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/madx")));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.graph.access_token.as_deref(), Some("toml-token"));
    assert_eq!(config.graph.page_id.as_deref(), Some("42"));
    assert_eq!(config.graph.request_timeout_secs, Some(5));
    assert_eq!(config.advisor.model.as_deref(), Some("gpt-4o"));
    assert!(!config.refresher.enabled);
    assert_eq!(config.refresher.interval_secs, 60);
    assert!(config.refresher.include_insights);
    assert_eq!(config.traversal.concurrency, 8);
    assert_eq!(config.traversal.deadline_secs, 0);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_or_default(Some(&dir.path().join("absent.toml"))).unwrap();
    assert!(config.graph.access_token.is_none());
    assert!(config.refresher.enabled);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[graph\naccess_token = ").unwrap();
    assert!(load_or_default(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_secret_env_overrides_toml() {
    env::set_var("MADX_TEST_SECRET", "env-value");
    let resolved = resolve_secret("test secret", "MADX_TEST_SECRET", Some("toml-value"));
    assert_eq!(resolved.as_deref(), Some("env-value"));
    env::remove_var("MADX_TEST_SECRET");
}

#[test]
#[serial]
fn test_secret_toml_fallback_and_whitespace_rejected() {
    env::set_var("MADX_TEST_SECRET", "   ");
    let resolved = resolve_secret("test secret", "MADX_TEST_SECRET", Some("toml-value"));
    assert_eq!(resolved.as_deref(), Some("toml-value"));

    let none = resolve_secret("test secret", "MADX_TEST_SECRET", Some(" "));
    assert!(none.is_none());
    env::remove_var("MADX_TEST_SECRET");
}

#[test]
#[serial]
fn test_root_folder_priority() {
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..TomlConfig::default()
    };

    env::set_var("MADX_TEST_ROOT", "/from/env");
    assert_eq!(
        resolve_root_folder(Some(Path::new("/from/cli")), "MADX_TEST_ROOT", &toml),
        PathBuf::from("/from/cli")
    );
    assert_eq!(
        resolve_root_folder(None, "MADX_TEST_ROOT", &toml),
        PathBuf::from("/from/env")
    );

    env::remove_var("MADX_TEST_ROOT");
    assert_eq!(
        resolve_root_folder(None, "MADX_TEST_ROOT", &toml),
        PathBuf::from("/from/toml")
    );

    let fallback = resolve_root_folder(None, "MADX_TEST_ROOT", &TomlConfig::default());
    assert!(!fallback.as_os_str().is_empty());
}
