// UI Styles
// The panel theme and the styles derived from it
// The compiled colors come from config.yaml; a YAML theme can replace them before the first panel exists.

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::app_config::compiled;
use crate::core::{PanelError, PanelResult};
use crate::utilities::parse_color;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Colors used to draw panels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub title_bar_bg: Color,
    pub title_bar_fg: Color,
    pub content_bg: Color,
    pub label_fg: Color,
    pub accent: Color,
    pub disabled_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title_bar_bg: rgb(compiled::TITLE_BAR_BG),
            title_bar_fg: rgb(compiled::TITLE_BAR_FG),
            content_bg: rgb(compiled::CONTENT_BG),
            label_fg: rgb(compiled::LABEL_FG),
            accent: rgb(compiled::ACCENT),
            disabled_fg: rgb(compiled::DISABLED_FG),
        }
    }
}

/// Theme document; every color is optional and falls back to the compiled one
#[derive(Debug, Default, Deserialize)]
struct ThemeDocument {
    #[serde(default)]
    colors: ThemeColors,
}

#[derive(Debug, Default, Deserialize)]
struct ThemeColors {
    title_bar_bg: Option<String>,
    title_bar_fg: Option<String>,
    content_bg: Option<String>,
    label_fg: Option<String>,
    accent: Option<String>,
    disabled_fg: Option<String>,
}

impl Theme {
    /// Parse a theme from YAML (`colors:` map of `#rrggbb` strings)
    pub fn from_yaml_str(source: &str) -> PanelResult<Self> {
        let document: ThemeDocument = serde_yaml::from_str(source).map_err(|e| PanelError::Parse {
            what: "theme",
            message: e.to_string(),
        })?;

        let base = Theme::default();
        let colors = document.colors;
        Ok(Self {
            title_bar_bg: pick(colors.title_bar_bg, base.title_bar_bg)?,
            title_bar_fg: pick(colors.title_bar_fg, base.title_bar_fg)?,
            content_bg: pick(colors.content_bg, base.content_bg)?,
            label_fg: pick(colors.label_fg, base.label_fg)?,
            accent: pick(colors.accent, base.accent)?,
            disabled_fg: pick(colors.disabled_fg, base.disabled_fg)?,
        })
    }

    /// Load a theme file
    pub fn load(path: &Path) -> PanelResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn pick(value: Option<String>, fallback: Color) -> PanelResult<Color> {
    match value {
        None => Ok(fallback),
        Some(text) => parse_color(&text).map(rgb).ok_or_else(|| PanelError::Parse {
            what: "theme",
            message: format!("'{}' is not a #rrggbb color", text),
        }),
    }
}

/// Install the compiled theme unless one is already installed
pub fn ensure_theme() {
    THEME.get_or_init(Theme::default);
}

/// The installed theme
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Panel styles, read from the installed theme
pub struct Styles;

impl Styles {
    /// Replace the default theme; only possible before the first panel is created
    pub fn use_external_theme(theme: Theme) -> PanelResult<()> {
        THEME.set(theme).map_err(|_| PanelError::ThemeLocked)
    }

    // === Title bar ===

    pub fn title_bar() -> Style {
        let theme = theme();
        Style::default().fg(theme.title_bar_fg).bg(theme.title_bar_bg)
    }

    pub fn title_bar_active() -> Style {
        Self::title_bar().add_modifier(Modifier::BOLD)
    }

    pub fn title_bar_dragging() -> Style {
        Self::title_bar().fg(theme().accent).add_modifier(Modifier::BOLD)
    }

    // === Content ===

    pub fn content() -> Style {
        let theme = theme();
        Style::default().fg(theme.title_bar_fg).bg(theme.content_bg)
    }

    pub fn border() -> Style {
        Self::content().fg(theme().title_bar_bg)
    }

    pub fn label() -> Style {
        Self::content().fg(theme().label_fg)
    }

    pub fn accent() -> Style {
        Self::content().fg(theme().accent)
    }

    pub fn disabled() -> Style {
        Self::content().fg(theme().disabled_fg)
    }

    /// Widget row of the focused control
    pub fn focused() -> Style {
        Self::content().add_modifier(Modifier::REVERSED)
    }

    /// Text being edited
    pub fn editing() -> Style {
        Self::content().fg(theme().accent).add_modifier(Modifier::UNDERLINED)
    }

    // === Bars ===

    pub fn track() -> Style {
        Self::content().fg(theme().disabled_fg)
    }

    pub fn fill() -> Style {
        Self::content().fg(theme().accent).add_modifier(Modifier::BOLD)
    }

    // === File picker ===

    pub fn picker_border() -> Style {
        Self::content().fg(theme().accent)
    }

    pub fn picker_selected() -> Style {
        Self::content().fg(theme().accent).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_uses_compiled_colors() {
        let theme = Theme::default();
        assert_eq!(theme.accent, rgb(compiled::ACCENT));
        assert_eq!(theme.content_bg, rgb(compiled::CONTENT_BG));
    }

    #[test]
    fn test_theme_yaml_overrides_some_colors() {
        let theme = Theme::from_yaml_str("colors:\n  accent: \"#ff0000\"\n").unwrap();
        assert_eq!(theme.accent, Color::Rgb(255, 0, 0));
        assert_eq!(theme.label_fg, Theme::default().label_fg);
    }

    #[test]
    fn test_empty_theme_document_is_default() {
        assert_eq!(Theme::from_yaml_str("{}").unwrap(), Theme::default());
    }

    #[test]
    fn test_bad_theme_color_is_a_parse_error() {
        let err = Theme::from_yaml_str("colors:\n  accent: teal\n").unwrap_err();
        assert!(matches!(err, PanelError::Parse { what: "theme", .. }));
    }

    #[test]
    fn test_external_theme_is_locked_once_installed() {
        ensure_theme();
        let err = Styles::use_external_theme(Theme::default()).unwrap_err();
        assert!(matches!(err, PanelError::ThemeLocked));
    }
}
