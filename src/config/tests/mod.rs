//! Unit tests for config module
//!
//! Tests configuration types, defaults, and validation.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic)]

use crate::config::{Config, ConfigError, LogLevel};
use crate::services::media_player::RepeatMode;

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.cloud_music.name, "Cloud Music");
    assert!(config.cloud_music.media_players.is_empty());
    assert_eq!(config.cloud_music.repeat, RepeatMode::All);
    assert!(!config.cloud_music.shuffle);
    assert!(config.cloud_music.auto_advance.enabled);
    assert_eq!(config.cloud_music.auto_advance.debounce_secs, 5);
}

#[test]
fn config_serialize_toml() {
    let toml_str = toml::to_string(&Config::default()).unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[cloud_music]"));
    assert!(toml_str.contains("[cloud_music.auto_advance]"));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [cloud_music]
        name = "Music"
        media_players = ["media_player.tv1", "media_player.kitchen"]
        repeat = "one"
        shuffle = true

        [cloud_music.auto_advance]
        debounce_secs = 8
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.cloud_music.name, "Music");
    assert_eq!(config.cloud_music.media_players.len(), 2);
    assert_eq!(config.cloud_music.repeat, RepeatMode::One);
    assert!(config.cloud_music.shuffle);
    assert_eq!(config.cloud_music.auto_advance.debounce_secs, 8);
    assert!(config.cloud_music.auto_advance.require_repeat);
}

#[test]
fn config_minimal_toml() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_rejects_malformed_target() {
    let toml_str = r#"
        [cloud_music]
        media_players = ["Media Player TV"]
    "#;

    match Config::from_toml_str(toml_str) {
        Err(ConfigError::Validation { component, .. }) => {
            assert_eq!(component, "cloud_music.media_players");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn config_rejects_unknown_repeat_mode() {
    let toml_str = r#"
        [cloud_music]
        repeat = "sometimes"
    "#;

    assert!(matches!(
        Config::from_toml_str(toml_str),
        Err(ConfigError::TomlParse { .. })
    ));
}

#[test]
fn config_schema_lists_sections() {
    let schema = serde_json::to_value(Config::schema()).unwrap();
    let properties = &schema["properties"];

    assert!(properties.get("general").is_some());
    assert!(properties.get("cloud_music").is_some());
}
