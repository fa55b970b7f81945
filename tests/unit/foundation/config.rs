use super::*;

#[test]
fn empty_object_is_default() {
    let cfg = SessionConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!(cfg.export_scale, 2.0);
    assert_eq!(cfg.image_cache_capacity, 8);
}

#[test]
fn partial_config_overrides_fields() {
    let cfg = SessionConfig::from_json_str(
        r#"{"canvas": {"width": 400, "height": 200}, "dark_mode": true}"#,
    )
    .unwrap();
    assert_eq!(cfg.canvas, CanvasSize::new(400, 200));
    assert!(cfg.dark_mode);
    assert_eq!(cfg.device_scale, 1.0);
}

#[test]
fn rejects_unknown_fields_and_bad_values() {
    assert!(SessionConfig::from_json_str(r#"{"canvs": {}}"#).is_err());
    assert!(
        SessionConfig::from_json_str(r#"{"canvas": {"width": 0, "height": 10}}"#).is_err()
    );
    assert!(SessionConfig::from_json_str(r#"{"export_scale": -2.0}"#).is_err());
    assert!(SessionConfig::from_json_str(r#"{"image_cache_capacity": 0}"#).is_err());
}

#[test]
fn load_resolves_assets_root_against_config_dir() {
    let dir = std::path::PathBuf::from("target")
        .join("unit_config")
        .join("load");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("session.json");
    std::fs::write(&path, r#"{"assets_root": "public"}"#).unwrap();

    let cfg = SessionConfig::load(&path).unwrap();
    assert_eq!(cfg.assets_root, dir.join("public"));
}

#[test]
fn load_missing_file_is_error() {
    let err = SessionConfig::load(std::path::Path::new("target/does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("read session config"));
}
