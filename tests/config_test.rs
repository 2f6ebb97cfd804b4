#[path = "common/mod.rs"]
mod common;

use common::KeepsakeTest;

// ============================================================================
// Config command tests
// ============================================================================

#[test]
fn test_config_show_empty() {
    let keepsake = KeepsakeTest::new();

    let output = keepsake.run_success(&["config", "show"]);
    assert!(output.contains("Configuration"));
    assert!(output.contains("not set"));
    assert!(output.contains("http://localhost:8000/api/v1/"));
}

#[test]
fn test_config_set_and_get_base_url() {
    let keepsake = KeepsakeTest::new();

    keepsake.run_success(&["config", "set", "api.base_url", "https://keepsake.example/api/v1/"]);
    let output = keepsake.run_success(&["config", "get", "api.base_url"]);
    assert_eq!(output.trim(), "https://keepsake.example/api/v1/");

    let json = keepsake.run_json(&["config", "show", "--json"]);
    assert_eq!(json["effective"]["api_base_url"], "https://keepsake.example/api/v1/");
    assert_eq!(json["effective"]["media_base_url"], "https://keepsake.example");
}

#[test]
fn test_config_token_is_masked() {
    let keepsake = KeepsakeTest::new();

    let output = keepsake.run_success(&["config", "set", "auth.token", "eyJhbGciOiJIUzI1NiJ9.abcd1234"]);
    assert!(output.contains("****1234"));
    assert!(!output.contains("eyJhbGci"));

    let show = keepsake.run_success(&["config", "show"]);
    assert!(!show.contains("eyJhbGci"));

    // The file itself keeps the full token.
    assert!(keepsake.read_config().contains("eyJhbGciOiJIUzI1NiJ9.abcd1234"));
}

#[test]
fn test_config_empty_value_clears_key() {
    let keepsake = KeepsakeTest::new();

    keepsake.run_success(&["config", "set", "media.base_url", "https://cdn.example"]);
    let output = keepsake.run_success(&["config", "set", "media.base_url", ""]);
    assert!(output.contains("Cleared"));

    let json = keepsake.run_json(&["config", "get", "media.base_url", "--json"]);
    assert!(json["value"].is_null());
}

#[test]
fn test_config_set_invalid_key() {
    let keepsake = KeepsakeTest::new();

    let stderr = keepsake.run_failure(&["config", "set", "invalid.key", "value"]);
    assert!(stderr.contains("api.base_url"));
}

#[test]
fn test_config_rejects_bad_values() {
    let keepsake = KeepsakeTest::new();

    let stderr = keepsake.run_failure(&["config", "set", "api.base_url", "not a url"]);
    assert!(stderr.contains("invalid URL"));

    let stderr = keepsake.run_failure(&["config", "set", "api.timeout", "0"]);
    assert!(stderr.contains("positive"));

    let stderr = keepsake.run_failure(&["config", "set", "search.debounce_ms", "soon"]);
    assert!(stderr.contains("whole number"));

    let stderr = keepsake.run_failure(&["config", "set", "locale", "fr"]);
    assert!(stderr.contains("locale"));
}

#[test]
fn test_config_file_created() {
    let keepsake = KeepsakeTest::new();

    keepsake.run_success(&["config", "set", "locale", "ko"]);

    assert!(keepsake.config_path().exists(), "Config file should be created");
    assert!(keepsake.read_config().contains("locale: ko"));

    let gitignore = keepsake.temp_dir.path().join(".keepsake").join(".gitignore");
    let content = std::fs::read_to_string(gitignore).unwrap();
    assert!(content.contains("config.yaml"));
}

#[cfg(unix)]
#[test]
fn test_config_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let keepsake = KeepsakeTest::new();
    keepsake.run_success(&["config", "set", "auth.token", "secret-token-value"]);

    let mode = std::fs::metadata(keepsake.config_path())
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
