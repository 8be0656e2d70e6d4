use super::*;
use tempfile::tempdir;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();

    let settings = load_settings(&dir.path().join("absent.json")).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.debounce_ms, 100);
    assert_eq!(settings.my_blocks_category, "My Blocks");
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "debounce_ms": 250, "workspace": { "zoom": { "start_scale": 1.0 } } }"#)
        .unwrap();

    let settings = load_settings(&path).unwrap();

    assert_eq!(settings.debounce_ms, 250);
    assert_eq!(settings.workspace.zoom.start_scale, 1.0);
    assert!(settings.workspace.zoom.controls);
    assert_eq!(settings.workspace.grid.colour, "#ddd");
}

#[test]
fn test_invalid_json_is_invalid_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_settings(&path).unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_written_defaults_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    write_default_settings(&path).unwrap();

    assert_eq!(load_settings(&path).unwrap(), Settings::default());
}
