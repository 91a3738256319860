//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use burnlink_core::config::{Config, ConfigBuilder, StorageBackend};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("burnlink.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.share.ttl_secs, config.share.ttl_secs);
    assert_eq!(loaded.share.max_id_attempts, config.share.max_id_attempts);
    assert_eq!(loaded.reaper.interval_secs, config.reaper.interval_secs);
    assert_eq!(loaded.storage.backend, config.storage.backend);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("burnlink.json5");
    let db = dir.path().join("shares.db");

    let config = ConfigBuilder::new()
        .ttl_secs(900)
        .reaper_interval_secs(60)
        .sqlite_backend(db.clone())
        .build();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.share.ttl_secs, 900);
    assert_eq!(loaded.reaper.interval_secs, 60);
    assert_eq!(loaded.storage.backend, StorageBackend::Sqlite);
    assert_eq!(loaded.database_path().unwrap(), db);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/burnlink.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}

#[test]
fn test_config_partial_file_gets_defaults() {
    let config = Config::parse("{ share: { ttl_secs: 600 } }").unwrap();
    assert_eq!(config.share.ttl_secs, 600);
    assert_eq!(config.reaper.interval_secs, 300);
    assert!(config.reaper.enabled);
}
