#![allow(dead_code)]

pub mod memory;
pub mod mock_data;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Environment variables that would leak the developer's own setup into a test.
const ISOLATED_VARS: &[&str] = &[
    "KEEPSAKE_ROOT",
    "KEEPSAKE_API_URL",
    "KEEPSAKE_MEDIA_URL",
    "KEEPSAKE_TOKEN",
    "KEEPSAKE_LOG",
];

/// Helper struct to run keepsake commands in an isolated temp directory
pub struct KeepsakeTest {
    pub temp_dir: TempDir,
    api_url: Option<String>,
    token: Option<String>,
}

impl KeepsakeTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        KeepsakeTest {
            temp_dir,
            api_url: None,
            token: None,
        }
    }

    /// Point every command at `api_url` (usually a wiremock server).
    pub fn with_api(mut self, api_url: &str) -> Self {
        self.api_url = Some(api_url.to_string());
        self
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_keepsake"));
        command.args(args).current_dir(self.temp_dir.path());
        for var in ISOLATED_VARS {
            command.env_remove(var);
        }
        if let Some(url) = &self.api_url {
            command.env("KEEPSAKE_API_URL", url);
        }
        if let Some(token) = &self.token {
            command.env("KEEPSAKE_TOKEN", token);
        }
        command.output().expect("Failed to execute keepsake command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).expect("command should print valid JSON")
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".keepsake").join("config.yaml")
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }

    /// Write a file into the temp directory and return its path.
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, bytes).expect("Failed to write test file");
        path
    }
}
