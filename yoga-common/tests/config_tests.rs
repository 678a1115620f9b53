//! Integration tests for configuration resolution and loading
//!
//! Covers:
//! - Priority order: CLI argument > YOGA_CONFIG > platform file > defaults
//! - Missing config files fall back to defaults without error
//! - Malformed config files are reported
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate YOGA_CONFIG are marked with #[serial].

use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use yoga_common::config::{load_config, resolve_config_path, YogaConfig, CONFIG_ENV_VAR};
use yoga_common::Error;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write config");
    file
}

#[test]
#[serial]
fn test_cli_argument_takes_precedence() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/yoga-from-env.toml");

    let resolved = resolve_config_path(Some(PathBuf::from("/tmp/yoga-from-cli.toml").as_path()));
    assert_eq!(resolved, Some(PathBuf::from("/tmp/yoga-from-cli.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/yoga-from-env.toml");

    let resolved = resolve_config_path(None);
    assert_eq!(resolved, Some(PathBuf::from("/tmp/yoga-from-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_blank_env_var_ignored() {
    env::set_var(CONFIG_ENV_VAR, "   ");

    let resolved = resolve_config_path(None);
    assert_ne!(resolved, Some(PathBuf::from("   ")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let missing = PathBuf::from(format!("/tmp/yoga-missing-{}.toml", std::process::id()));

    let config = load_config(Some(missing.as_path())).expect("Missing file should not be an error");
    assert_eq!(config, YogaConfig::default());
}

#[test]
#[serial]
fn test_loads_file_from_env_var() {
    let file = write_config(
        r#"
        bind_address = "0.0.0.0:8080"
        alpha_user_ids = ["seed"]
        search_limit = 10
        "#,
    );
    env::set_var(CONFIG_ENV_VAR, file.path());

    let config = load_config(None).expect("Should load config");
    assert_eq!(config.bind_address, "0.0.0.0:8080");
    assert_eq!(config.alpha_user_ids, vec!["seed"]);
    assert_eq!(config.search_limit, 10);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let file = write_config("alpha_user_ids = [unterminated");

    let result = load_config(Some(file.path()));
    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("Invalid TOML")),
        other => panic!("Expected config error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_file_error_names_path_once() {
    env::remove_var(CONFIG_ENV_VAR);
    let file = write_config("search_limit = 0");

    let err = load_config(Some(file.path())).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Configuration error: "), "{}", message);
    assert!(message.contains(&file.path().display().to_string()));
    assert!(message.contains("search_limit must be at least 1"));
    assert_eq!(message.matches("Configuration error").count(), 1, "{}", message);
}

#[test]
fn test_config_roundtrips_through_toml() {
    let config = YogaConfig {
        alpha_user_ids: vec!["seed-1".into()],
        search_limit: 25,
        ..Default::default()
    };

    let text = toml::to_string(&config).expect("Should serialize");
    let parsed = YogaConfig::from_toml_str(&text).expect("Should parse");
    assert_eq!(parsed, config);
}
