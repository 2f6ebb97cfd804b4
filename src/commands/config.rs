//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print a single value
//! - `config set`: Set a configuration value

use serde_json::{Map, Value, json};

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::{dimmed, heading};
use crate::error::Result;
use crate::paths::format_relative_path;

/// Show current configuration. The token is masked.
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let entries = config.entries();

    let mut values = Map::new();
    for (key, value) in &entries {
        values.insert((*key).to_string(), Value::String(value.clone()));
    }
    let json_output = json!({
        "values": values,
        "effective": {
            "api_base_url": config.api_base_url(),
            "media_base_url": config.media_base_url()?,
            "token_configured": config.auth_token().is_some(),
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut text_output = format!("{}\n\n", heading("Configuration:"));
    for (key, value) in &entries {
        let value = if value == "-" {
            dimmed("not set")
        } else {
            value.clone()
        };
        text_output.push_str(&format!("  {}  {value}\n", heading(&format!("{key:width$}"))));
    }
    text_output.push('\n');
    text_output.push_str(&dimmed(&format!(
        "API: {}",
        config.api_base_url()
    )));
    text_output.push('\n');
    text_output.push_str(&dimmed(&format!(
        "Config file: {}",
        format_relative_path(&Config::config_path())
    )));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Set a configuration value and save the file
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = config.get(key)?;
    let text = match &shown {
        Some(shown) => format!("Set {} to {shown}", heading(key)),
        None => format!("Cleared {}", heading(key)),
    };
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(text)
    .print(output)
}

pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    let text = value.clone().unwrap_or_else(|| dimmed("not set"));
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(text)
        .print(output)
}
