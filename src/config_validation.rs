// Configuration validation module
// Loads the host config with recovery and turns its strings into typed settings

use anyhow::Result;
use crossterm::event::KeyCode;
use std::path::PathBuf;

use crate::config::{default_config_path, load_config, HostConfig};

/// Host config plus what validation derived or complained about
/// Warnings are collected rather than logged because logging is configured from this file.
#[derive(Debug)]
pub struct ValidatedConfig {
    pub config: HostConfig,
    pub toggle_key: Option<KeyCode>,
    pub warnings: Vec<String>,
}

/// Load and validate configuration with error recovery
/// A missing file yields the defaults; a malformed one is an error.
pub fn load_and_validate_config(config_path: Option<PathBuf>) -> Result<ValidatedConfig> {
    let path = config_path.unwrap_or_else(default_config_path);
    let mut warnings = Vec::new();

    let mut config = if path.exists() {
        load_config(&path)?
    } else {
        warnings.push(format!("config file {} not found, using defaults", path.display()));
        HostConfig::default()
    };

    let toggle_key = match config.toggle_key.as_deref() {
        None => None,
        Some(name) => {
            let key = parse_key(name);
            if key.is_none() {
                warnings.push(format!("unrecognised toggle key '{}', panels will not toggle", name));
            }
            key
        }
    };

    if !config.picker_root.is_dir() {
        warnings.push(format!(
            "picker root {} is not a directory, using the working directory",
            config.picker_root.display()
        ));
        config.picker_root = PathBuf::from(".");
    }

    config.descriptors.retain(|descriptor| {
        let exists = descriptor.is_file();
        if !exists {
            warnings.push(format!("descriptor {} not found, skipping", descriptor.display()));
        }
        exists
    });

    Ok(ValidatedConfig {
        config,
        toggle_key,
        warnings,
    })
}

/// `F1`..`F12`, named keys, or a single character
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let lower = name.to_ascii_lowercase();
    if let Some(number) = lower.strip_prefix('f') {
        return number.parse::<u8>().ok().filter(|n| (1..=12).contains(n)).map(KeyCode::F);
    }
    match lower.as_str() {
        "tab" => Some(KeyCode::Tab),
        "insert" => Some(KeyCode::Insert),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        _ => None,
    }
}
