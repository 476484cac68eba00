use metalworks_web::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;

const BIN: &str = "metalworks-web";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("MW_SERVER__PORT");
        env::remove_var("MW_BACKEND__API_BASE_URL");
        env::remove_var("MW_SITE__BASE_URL");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("API_BASE_URL");
        env::remove_var("RATE_LIMIT_ENABLED");
        env::remove_var("TIMEOUT_DISABLED");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.static_dir, "static");
    assert_eq!(config.backend.api_base_url, "http://localhost:8000/api/");
    assert!(config.resilience.rate_limit_enabled);
    assert_eq!(config.log.format, "pretty");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("MW_SERVER__PORT", "9090");
        env::set_var("MW_SITE__BASE_URL", "https://metal.example");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.site.base_url, "https://metal.example");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    writeln!(
        file,
        r#"
server:
  port: 7070
backend:
  api_base_url: "http://api.internal/api/"
session:
  ttl_minutes: 30
"#
    )
    .expect("Failed to write temp config");

    // Tell AppConfig to use this file via Env Var (mocking CLI arg indirectly)
    unsafe {
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.backend.api_base_url, "http://api.internal/api/");
    assert_eq!(config.session.ttl_minutes, 30);
    // Untouched sections keep their defaults.
    assert_eq!(config.session.cookie_name, "mw_session");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env_and_file() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    writeln!(file, "server:\n  port: 7070").expect("Failed to write temp config");
    unsafe {
        env::set_var("MW_SERVER__PORT", "8080");
    }

    let path = file.path().to_string_lossy().to_string();
    let config = AppConfig::load_from_args([BIN, "--config", path.as_str(), "--port", "5050"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 5050);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_fails() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "does-not-exist.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    // Create ./config.yaml
    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args([BIN]);

    fs::remove_file(cwd_path).unwrap();

    assert_eq!(config.expect("Failed to load config").server.port, 6060);
}
