//! Tests for configuration system

use mealgen::Config;
use temp_dir::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> String {
    let path = dir.child("mealgen.toml");
    std::fs::write(&path, contents).expect("Failed to write config file");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_config_loads_from_default_toml() {
    let config = Config::load(None).expect("Failed to load config");

    assert!(!config.server.host.is_empty());
    assert!(config.server.port > 0);
    assert!(!config.gemini.model.is_empty());
    assert!(!config.observability.log_level.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
host = "0.0.0.0"
port = 8080

[gemini]
model = "gemini-2.0-flash"

[client]
endpoint_base_url = "http://meals.internal:8080"

[observability]
format = "json"
"#,
    );

    let config = Config::load(Some(path)).expect("Failed to load config");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.gemini.model, "gemini-2.0-flash");
    assert_eq!(config.gemini.base_url, mealgen_llm::DEFAULT_BASE_URL);
    assert_eq!(
        config.client.endpoint_base_url,
        "http://meals.internal:8080"
    );
    assert_eq!(config.observability.format, "json");
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn test_missing_sections_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server]\nport = 4000\n");

    let config = Config::load(Some(path)).expect("Failed to load config");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.gemini.model, mealgen_llm::DEFAULT_MODEL);
    assert_eq!(config.client.endpoint_base_url, "http://localhost:3001");
    assert_eq!(config.observability.format, "pretty");
}

#[test]
fn test_nonexistent_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("absent.toml").to_string_lossy().into_owned();

    let config = Config::load(Some(path)).expect("Failed to load config");

    assert_eq!(config.server.port, 3001);
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[server]\nport = 3001\n\n[observability]\nformat = \"yaml\"\n",
    );

    let config = Config::load(Some(path)).expect("Failed to load config");

    assert!(config.validate().is_err());
}
