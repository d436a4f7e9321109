//! Config file round-trip tests

use flatdraw_settings::{Config, SettingsError};
use tempfile::TempDir;

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.workspace.end_tolerance_mm = 4.0;
    config.motion.hover_height_m = 0.02;
    config.robot.address = "10.0.0.5".to_string();
    config.execution.timeout_ms = Some(30_000);

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config::default();
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut value = serde_json::to_value(Config::default()).unwrap();
    value["motion"]["linear_speed"] = serde_json::json!(-0.1);
    std::fs::write(&path, value.to_string()).unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[workspace\nend_tolerance_mm = ").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlParse(_))
    ));
}

#[test]
fn test_partial_sections_fill_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    std::fs::write(
        &path,
        "[motion]\nhover_height_m = 0.02\n\n[robot]\naddress = \"10.0.0.5\"\n",
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.motion.hover_height_m, 0.02);
    assert_eq!(config.motion.linear_speed, 0.15);
    assert_eq!(config.robot.address, "10.0.0.5");
    assert_eq!(config.robot.script_name, "draw_in_2D");
    assert_eq!(config.execution.max_attempts, 1);
}
