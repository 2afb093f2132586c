//! Integration tests for ConfigResolver against a real filesystem
//!
//! These tests verify:
//! - Upward discovery of syntax.json and where it stops
//! - Explicit syntax files and their fatal errors
//! - Plugin overrides disabling discovery
//! - Key-by-key precedence of overrides over file values

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use std::fs;
use syntux::{ConfigError, ConfigResolver, ConfigSource, MARKER_FILE, OverrideMap};
use tempfile::TempDir;

fn create_test_tree() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    fs::create_dir_all(root.join("x/y/z")).unwrap();
    (temp_dir, root)
}

fn overrides(pairs: &[(&str, serde_json::Value)]) -> OverrideMap {
    pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
}

#[test]
fn test_discovers_nearest_ancestor_file() {
    let (_temp_dir, root) = create_test_tree();
    fs::write(root.join("x").join(MARKER_FILE), r#"{"indent": 2}"#).unwrap();
    fs::write(root.join(MARKER_FILE), r#"{"indent": 8}"#).unwrap();

    let resolver = ConfigResolver::new(root.join("x/y/z"));
    let resolved = resolver.resolve(None, &OverrideMap::new()).unwrap();

    assert_eq!(
        resolved.source,
        ConfigSource::Discovered(root.join("x").join(MARKER_FILE))
    );
    assert_eq!(resolved.config.get("indent"), Some(&json!(2)));
}

#[test]
fn test_discovers_file_in_start_dir() {
    let (_temp_dir, root) = create_test_tree();
    let start = root.join("x/y/z");
    fs::write(start.join(MARKER_FILE), r#"{"final_newline": true}"#).unwrap();

    let resolved = ConfigResolver::new(&start)
        .resolve(None, &OverrideMap::new())
        .unwrap();

    assert_eq!(resolved.source, ConfigSource::Discovered(start.join(MARKER_FILE)));
}

#[test]
fn test_directory_named_like_marker_is_ignored() {
    let (_temp_dir, root) = create_test_tree();
    fs::create_dir(root.join("x/y").join(MARKER_FILE)).unwrap();
    fs::write(root.join("x").join(MARKER_FILE), "{}").unwrap();

    let resolved = ConfigResolver::new(root.join("x/y/z"))
        .resolve(None, &OverrideMap::new())
        .unwrap();

    assert_eq!(
        resolved.source,
        ConfigSource::Discovered(root.join("x").join(MARKER_FILE))
    );
}

#[test]
fn test_overrides_never_read_discovered_file() {
    let (_temp_dir, root) = create_test_tree();
    // Malformed on purpose: reading it would be a fatal error.
    fs::write(root.join("x").join(MARKER_FILE), "{ not json").unwrap();

    let resolved = ConfigResolver::new(root.join("x/y/z"))
        .resolve(None, &overrides(&[("line_endings", json!("lf"))]))
        .unwrap();

    assert_eq!(resolved.source, ConfigSource::None);
    assert_eq!(
        serde_json::to_value(&resolved.config).unwrap(),
        json!({"line_endings": "lf"})
    );
}

#[test]
fn test_discovered_malformed_file_is_fatal() {
    let (_temp_dir, root) = create_test_tree();
    let marker = root.join("x").join(MARKER_FILE);
    fs::write(&marker, "{ not json").unwrap();

    let err = ConfigResolver::new(root.join("x/y/z"))
        .resolve(None, &OverrideMap::new())
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidConfigJson { .. }));
    assert_eq!(err.path(), &marker);
    assert!(err.to_string().ends_with(&format!(" in {}", marker)));
}

#[test]
fn test_explicit_relative_path() {
    let (_temp_dir, root) = create_test_tree();
    fs::write(root.join("x/custom.json"), r#"{"a": 1, "b": 2}"#).unwrap();
    // A marker that discovery would find; explicit mode must not use it.
    fs::write(root.join("x/y/z").join(MARKER_FILE), r#"{"a": 100}"#).unwrap();

    let resolver = ConfigResolver::new(root.join("x/y/z"));
    let resolved = resolver
        .resolve(Some(Utf8Path::new("../../custom.json")), &overrides(&[("b", json!(3))]))
        .unwrap();

    assert_eq!(
        resolved.source,
        ConfigSource::Explicit(root.join("x/y/z/../../custom.json"))
    );
    assert_eq!(
        serde_json::to_value(&resolved.config).unwrap(),
        json!({"a": 1, "b": 3})
    );
}

#[test]
fn test_explicit_missing_file_is_fatal() {
    let (_temp_dir, root) = create_test_tree();
    let missing = root.join("nope.json");

    let err = ConfigResolver::new(&root)
        .resolve(Some(missing.as_path()), &OverrideMap::new())
        .unwrap_err();

    assert!(matches!(err, ConfigError::ConfigFileNotFound { .. }));
    assert_eq!(err.to_string(), format!("ConfigFileNotFound: {}", missing));
}

#[test]
fn test_file_values_forwarded_verbatim() {
    let (_temp_dir, root) = create_test_tree();
    let raw = json!({
        "indent": "  ",
        "custom_plugin": {"nested": [1, 2, {"deep": null}]},
    });
    fs::write(root.join(MARKER_FILE), raw.to_string()).unwrap();

    let resolved = ConfigResolver::new(&root)
        .resolve(None, &OverrideMap::new())
        .unwrap();

    assert_eq!(serde_json::to_value(&resolved.config).unwrap(), raw);
}
