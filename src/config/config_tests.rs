use super::*;
use crate::keys::NamedKey;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.trigger, '/');
    assert_eq!(config.storage_path, None);
    assert!(config.watch_storage);
    assert_eq!(config.get_storage_path(), DEFAULT_STORAGE_PATH);
    assert!(config.validate().is_ok());
}

#[test]
fn test_menu_config_defaults() {
    let menu = MenuConfig::default();
    assert_eq!(menu.gap_px, DEFAULT_MENU_GAP_PX);
    assert_eq!(menu.max_tags_shown, 2);
    assert_eq!(menu.max_visible_items, DEFAULT_MENU_MAX_VISIBLE_ITEMS);
}

#[test]
fn test_empty_json_uses_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_json() {
    let config: Config = serde_json::from_str(
        r#"{"trigger":";","storagePath":"/tmp/s.json","menu":{"gapPx":8}}"#,
    )
    .unwrap();
    assert_eq!(config.trigger, ';');
    assert_eq!(config.get_storage_path(), "/tmp/s.json");
    assert_eq!(config.menu.gap_px, 8.0);
    assert_eq!(config.menu.item_height_px, DEFAULT_MENU_ITEM_HEIGHT_PX);
    assert_eq!(config.keys.commit, vec![NamedKey::Enter, NamedKey::Tab]);
}

#[test]
fn test_config_serialization() {
    let mut config = Config::default();
    config.trigger = '@';
    config.storage_path = Some("~/s.json".to_string());

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"storagePath\""));
    let deserialized: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_validate_rejects_whitespace_trigger() {
    let config = Config {
        trigger: ' ',
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_brace_trigger() {
    let config = Config {
        trigger: '{',
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_requires_commit_key() {
    let mut config = Config::default();
    config.keys.commit.clear();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, crate::error::ExpandError::Config(_)));
    assert!(err.to_string().contains("commit key"));
}

#[test]
fn test_load_config_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = load_config_from(&dir.path().join("config.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r##"{"trigger":"#","watchStorage":false}"##).unwrap();

    let config = load_config_from(&path);
    assert_eq!(config.trigger, '#');
    assert!(!config.watch_storage);
}

#[test]
fn test_load_config_invalid_json_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(load_config_from(&path), Config::default());
}

#[test]
fn test_load_config_invalid_values_fall_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"trigger":"\t"}"#).unwrap();
    assert_eq!(load_config_from(&path), Config::default());
}
