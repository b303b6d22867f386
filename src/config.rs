// Configuration loading module
// Runtime settings for the interactive host, read from quick-settings.yaml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "quick-settings.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Panel descriptors (JSON or YAML) to load, one panel each
    pub descriptors: Vec<PathBuf>,

    /// Optional YAML theme replacing the compiled colors
    pub theme: Option<PathBuf>,

    /// Key that shows or hides every panel, e.g. `F2` or `h`
    pub toggle_key: Option<String>,

    /// Capture the mouse for dragging and clicking
    pub mouse: bool,

    /// Directory the file picker lists
    pub picker_root: PathBuf,

    /// Where tracing output goes; the terminal belongs to the UI
    pub log_file: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            descriptors: Vec::new(),
            theme: None,
            toggle_key: Some("F2".to_string()),
            mouse: true,
            picker_root: PathBuf::from("."),
            log_file: PathBuf::from("quick-settings.log"),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

pub fn load_config(config_path: &Path) -> Result<HostConfig> {
    let contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config: HostConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quick-settings.yaml");
        fs::write(&path, "descriptors: [demos/settings.yaml]\nmouse: false\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.descriptors, vec![PathBuf::from("demos/settings.yaml")]);
        assert!(!config.mouse);
        assert_eq!(config.toggle_key.as_deref(), Some("F2"));
        assert_eq!(config.log_file, HostConfig::default().log_file);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quick-settings.yaml");
        fs::write(&path, "mouse: [not, a, bool]\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
