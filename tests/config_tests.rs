use project_muse::common::CommonParams;
use project_muse::config::{BIND_ENV, Config, GITHUB_TOKEN_ENV, PORT_ENV, PROVIDER_ENV};
use project_muse::providers::Provider;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_match_documented_values() {
    let config = Config::default();

    assert_eq!(config.provider().ok(), Some(Provider::Google));
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.github.user_agent, "Project-Muse-Agent");
    assert_eq!(config.github.repos_per_page, 15);
    assert_eq!(config.github.stats_per_page, 100);
    assert_eq!(config.github.starred_per_page, 20);
    assert_eq!(config.server.function_path, "/githubProjectSuggestFunction");
    assert!((config.suggestion.temperature - 0.6).abs() < f64::EPSILON);
    assert_eq!(config.suggestion.max_turns, 8);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .update(
            Some(Provider::OpenAI),
            Some("sk-test".to_string()),
            Some("gpt-4.1".to_string()),
            Some(0.3),
            Some("ghp_saved".to_string()),
        )
        .expect("update should succeed");
    config.save_to(&path).expect("config should save");

    let loaded = Config::load_from(&path).expect("config should load");
    assert_eq!(loaded, config);
    assert_eq!(loaded.provider().ok(), Some(Provider::OpenAI));
    assert!((loaded.temperature(Provider::OpenAI) - 0.3).abs() < f64::EPSILON);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server]\nbind = \"0.0.0.0:9000\"\n").expect("write config");

    let loaded = Config::load_from(&path).expect("config should load");
    assert_eq!(loaded.server.bind, "0.0.0.0:9000");
    assert_eq!(loaded.server.function_path, "/githubProjectSuggestFunction");
    assert_eq!(loaded.github.repos_per_page, 15);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("config.toml");
    fs::write(&path, "default_provider = [").expect("write config");

    let err = Config::load_from(&path).expect_err("malformed config must fail");
    assert!(err.to_string().contains("Invalid configuration file format"));
}

#[test]
fn test_environment_overrides_secrets_and_bind() {
    let mut config = Config::default();
    config.apply_env_overrides(lookup(&[
        (GITHUB_TOKEN_ENV, "ghp_env"),
        (PROVIDER_ENV, "OpenAI"),
        ("OPENAI_API_KEY", "sk-env"),
        (PORT_ENV, "8081"),
    ]));

    assert_eq!(config.github.token.as_deref(), Some("ghp_env"));
    assert_eq!(config.provider().ok(), Some(Provider::OpenAI));
    assert_eq!(config.api_key(Provider::OpenAI).ok().as_deref(), Some("sk-env"));
    assert_eq!(config.server.bind, "0.0.0.0:8081");

    config.apply_env_overrides(lookup(&[(BIND_ENV, "127.0.0.1:7000"), (PORT_ENV, "9")]));
    assert_eq!(config.server.bind, "127.0.0.1:7000");
}

#[test]
fn test_empty_environment_values_are_ignored() {
    let mut config = Config::default();
    config.github.token = Some("ghp_file".to_string());
    config.apply_env_overrides(lookup(&[(GITHUB_TOKEN_ENV, "  ")]));
    assert_eq!(config.github.token.as_deref(), Some("ghp_file"));
}

#[test]
fn test_missing_api_key_names_the_variable() {
    let err = Config::default()
        .api_key(Provider::Google)
        .expect_err("no key configured");
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[test]
fn test_temperature_out_of_range_is_rejected() {
    let mut config = Config::default();
    assert!(config.update(None, None, None, Some(2.5), None).is_err());
}

#[test]
fn test_common_params_override_loaded_config() {
    let mut config = Config::default();
    let common = CommonParams {
        provider: Some("openai".to_string()),
        model: None,
    };
    assert!(common.apply_to_config(&mut config).expect("overrides apply"));
    assert_eq!(config.provider().ok(), Some(Provider::OpenAI));
}
