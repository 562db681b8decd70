use polarmill_core::{MillingDirection, ShapeKind};
use polarmill_settings::{Config, SettingsError};
use tempfile::tempdir;

fn custom_config() -> Config {
    let mut config = Config::new();
    config.machining.shape = ShapeKind::TwoFlat;
    config.machining.across_flats = 20.0;
    config.machining.tool_diameter = 10.0;
    config.machining.direction = MillingDirection::Conventional;
    config.sync.quiet_period_ms = 1000;
    config.program.program_number = 42;
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("polarmill.toml");

    let config = custom_config();
    config.save_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("shape = \"two_flat\""));
    assert!(content.contains("direction = \"conventional\""));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("polarmill.json");

    let config = custom_config();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.program_options().program_number, 42);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"machining": {"tool_diameter": 0.0}}"#).unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parameter(_)));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = Config::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_parameter_store_from_config() {
    let mut store = custom_config().parameter_store();
    let result = store.compute().unwrap();
    assert!(result.program.starts_with("%\nO0042(N2 S20 D10 R0.5)\n"));
    assert!(result.program.contains("G02 X"));
}
