//! Unit tests for configuration resolution and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate RELAB_TEST_* variables are marked with #[serial].

use relab_common::config::{load_toml_config, resolve_config_path, resolve_folder, LoggingConfig};
use serde::Deserialize;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, PartialEq)]
struct SampleToml {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    logging: LoggingConfig,
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let config: SampleToml =
        load_toml_config(Some(Path::new("/nonexistent/relab/ingest.toml"))).unwrap();
    assert_eq!(config, SampleToml::default());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_no_config_path_uses_defaults() {
    let config: SampleToml = load_toml_config(None).unwrap();
    assert!(config.data_dir.is_none());
}

#[test]
fn test_config_file_is_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ingest.toml");
    std::fs::write(
        &path,
        "data_dir = \"/srv/relab/data\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let config: SampleToml = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/relab/data")));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ingest.toml");
    std::fs::write(&path, "data_dir = [unterminated\n").unwrap();

    let result: relab_common::Result<SampleToml> = load_toml_config(Some(&path));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Parse"), "unexpected error: {}", err);
}

#[test]
#[serial]
fn test_cli_argument_beats_environment() {
    env::set_var("RELAB_TEST_CONFIG", "/from/env.toml");
    let resolved = resolve_config_path(
        Some(Path::new("/from/cli.toml")),
        "RELAB_TEST_CONFIG",
        "ingest.toml",
    );
    assert_eq!(resolved, Some(PathBuf::from("/from/cli.toml")));
    env::remove_var("RELAB_TEST_CONFIG");
}

#[test]
#[serial]
fn test_environment_used_without_cli_argument() {
    env::set_var("RELAB_TEST_CONFIG", "/from/env.toml");
    let resolved = resolve_config_path(None, "RELAB_TEST_CONFIG", "ingest.toml");
    assert_eq!(resolved, Some(PathBuf::from("/from/env.toml")));
    env::remove_var("RELAB_TEST_CONFIG");
}

#[test]
#[serial]
fn test_folder_resolution_priority() {
    env::remove_var("RELAB_TEST_ROOT");
    let default = Path::new("/default");
    let toml = Path::new("/from/toml");

    assert_eq!(
        resolve_folder(None, "RELAB_TEST_ROOT", None, default),
        PathBuf::from("/default")
    );
    assert_eq!(
        resolve_folder(None, "RELAB_TEST_ROOT", Some(toml), default),
        PathBuf::from("/from/toml")
    );

    env::set_var("RELAB_TEST_ROOT", "/from/env");
    assert_eq!(
        resolve_folder(None, "RELAB_TEST_ROOT", Some(toml), default),
        PathBuf::from("/from/env")
    );
    assert_eq!(
        resolve_folder(Some(Path::new("/from/cli")), "RELAB_TEST_ROOT", Some(toml), default),
        PathBuf::from("/from/cli")
    );
    env::remove_var("RELAB_TEST_ROOT");
}
