//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and the
//! process environment.

use std::io::Write;
use std::path::PathBuf;

use keyward_domain::{KeywardError, StoreBackend};
use keyward_infra::config;
use parking_lot::Mutex;
use tempfile::NamedTempFile;

// Tests touching process environment variables run one at a time.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "provisioning": {
            "secret_name": "cluster-key",
            "store_timeout_ms": 5000
        },
        "store": {
            "backend": "file",
            "root": "/var/lib/keyward"
        },
        "logging": {
            "filter": "keyward=debug",
            "json": true
        }
    }"#;

    let mut temp_file = NamedTempFile::with_suffix(".json").expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("Failed to load config from JSON file");

    assert_eq!(config.provisioning.secret_name, "cluster-key");
    assert_eq!(config.provisioning.key_field, "key");
    assert_eq!(config.provisioning.store_timeout_ms, 5000);
    assert_eq!(config.store.backend, StoreBackend::File);
    assert_eq!(config.store.root, Some(PathBuf::from("/var/lib/keyward")));
    assert_eq!(config.logging.filter, "keyward=debug");
    assert!(config.logging.json);
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[provisioning]
store_timeout_ms = 0

[iv]
annotation = "example.com/encryption-iv"
"#;

    let mut temp_file = NamedTempFile::with_suffix(".toml").expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    assert_eq!(config.provisioning.store_timeout_ms, 0);
    assert!(config.provisioning.store_timeout().is_zero());
    assert_eq!(config.iv.annotation, "example.com/encryption-iv");
    assert_eq!(config.store.backend, StoreBackend::Memory);
}

#[test]
fn test_file_backend_without_root_is_rejected() {
    let mut temp_file = NamedTempFile::with_suffix(".toml").expect("Failed to create temp file");
    temp_file.write_all(b"[store]\nbackend = \"file\"\n").expect("Failed to write to temp file");

    let err = config::load_from_file(Some(temp_file.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, KeywardError::Config(_)));
    assert!(err.to_string().contains("store.root"));
}

#[test]
fn test_load_explicit_file_with_env_overrides() {
    let _guard = ENV_LOCK.lock();

    let mut temp_file = NamedTempFile::with_suffix(".toml").expect("Failed to create temp file");
    temp_file
        .write_all(b"[provisioning]\nsecret_name = \"from-file\"\nstore_timeout_ms = 100\n")
        .expect("Failed to write to temp file");

    std::env::set_var("KEYWARD_CONFIG", temp_file.path());
    std::env::set_var("KEYWARD_STORE_TIMEOUT_MS", "750");

    let result = config::load();

    std::env::remove_var("KEYWARD_CONFIG");
    std::env::remove_var("KEYWARD_STORE_TIMEOUT_MS");

    let config = result.expect("Should load file and apply env overrides");
    assert_eq!(config.provisioning.secret_name, "from-file");
    assert_eq!(config.provisioning.store_timeout_ms, 750);
}

#[test]
fn test_load_explicit_missing_file_fails() {
    let _guard = ENV_LOCK.lock();

    std::env::set_var("KEYWARD_CONFIG", "/nonexistent/keyward.toml");
    let result = config::load();
    std::env::remove_var("KEYWARD_CONFIG");

    assert!(matches!(result, Err(KeywardError::Config(_))));
}

#[test]
fn test_load_from_env() {
    let _guard = ENV_LOCK.lock();

    std::env::set_var("KEYWARD_STORE_BACKEND", "file");
    std::env::set_var("KEYWARD_STORE_ROOT", "/srv/keys");
    std::env::set_var("KEYWARD_LOG_JSON", "true");

    let result = config::load_from_env();

    std::env::remove_var("KEYWARD_STORE_BACKEND");
    std::env::remove_var("KEYWARD_STORE_ROOT");
    std::env::remove_var("KEYWARD_LOG_JSON");

    let config = result.expect("Should load config from env vars");
    assert_eq!(config.store.backend, StoreBackend::File);
    assert_eq!(config.store.root, Some(PathBuf::from("/srv/keys")));
    assert!(config.logging.json);
    assert_eq!(config.provisioning.secret_name, "policy-encryption-key");
}
