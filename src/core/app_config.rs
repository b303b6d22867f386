// Panel Configuration
// Defaults compiled from config.yaml at build time
// Modify config.yaml and rebuild to change these values

// Include the auto-generated config from build.rs
pub mod compiled {
    include!(concat!(env!("OUT_DIR"), "/compiled_config.rs"));
}

/// Height of a panel's title bar, in terminal rows
pub const TITLE_BAR_HEIGHT: u16 = compiled::TITLE_BAR_HEIGHT;

/// Defaults applied to every newly created panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDefaults {
    /// Title used when the caller passes none
    pub title: String,

    /// Panel width in columns
    pub width: u16,

    /// Grid pitch used when snap-to-grid is enabled
    pub grid_size: u16,

    /// Maximum gap between two clicks that counts as a double-click
    pub double_click_ms: u64,
}

impl Default for PanelDefaults {
    fn default() -> Self {
        Self {
            title: compiled::DEFAULT_TITLE.to_string(),
            width: compiled::DEFAULT_WIDTH,
            grid_size: compiled::GRID_SIZE,
            double_click_ms: compiled::DOUBLE_CLICK_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let defaults = PanelDefaults::default();
        assert!(!defaults.title.is_empty());
        assert!(defaults.width > 0);
        assert!(defaults.grid_size > 0);
        assert!(TITLE_BAR_HEIGHT > 0);
    }
}
