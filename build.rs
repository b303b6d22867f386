// Build Script
// Compiles panel defaults and theme colors from src/config.yaml into constants

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/config.yaml");

    let out_path = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR")).join("compiled_config.rs");

    // Missing file means the built-in defaults
    let config = match fs::read_to_string("src/config.yaml") {
        Ok(content) => parse_config(&content),
        Err(_) => CompiledConfig::default(),
    };

    let generated = format!(
        r#"// Generated by build.rs from src/config.yaml; edit that file instead

pub const DEFAULT_TITLE: &str = "{default_title}";
pub const DEFAULT_WIDTH: u16 = {default_width};
pub const TITLE_BAR_HEIGHT: u16 = {title_bar_height};
pub const GRID_SIZE: u16 = {grid_size};
pub const DOUBLE_CLICK_MS: u64 = {double_click_ms};

// Theme colors (RGB tuples)
pub const TITLE_BAR_BG: (u8, u8, u8) = {title_bar_bg};
pub const TITLE_BAR_FG: (u8, u8, u8) = {title_bar_fg};
pub const CONTENT_BG: (u8, u8, u8) = {content_bg};
pub const LABEL_FG: (u8, u8, u8) = {label_fg};
pub const ACCENT: (u8, u8, u8) = {accent};
pub const DISABLED_FG: (u8, u8, u8) = {disabled_fg};
"#,
        default_title = config.default_title,
        default_width = config.default_width,
        title_bar_height = config.title_bar_height,
        grid_size = config.grid_size,
        double_click_ms = config.double_click_ms,
        title_bar_bg = rgb(config.title_bar_bg),
        title_bar_fg = rgb(config.title_bar_fg),
        content_bg = rgb(config.content_bg),
        label_fg = rgb(config.label_fg),
        accent = rgb(config.accent),
        disabled_fg = rgb(config.disabled_fg),
    );

    fs::write(&out_path, generated).expect("writing compiled_config.rs");
}

fn rgb(c: (u8, u8, u8)) -> String {
    format!("({}, {}, {})", c.0, c.1, c.2)
}

struct CompiledConfig {
    default_title: String,
    default_width: u16,
    title_bar_height: u16,
    grid_size: u16,
    double_click_ms: u64,
    title_bar_bg: (u8, u8, u8),
    title_bar_fg: (u8, u8, u8),
    content_bg: (u8, u8, u8),
    label_fg: (u8, u8, u8),
    accent: (u8, u8, u8),
    disabled_fg: (u8, u8, u8),
}

impl Default for CompiledConfig {
    fn default() -> Self {
        Self {
            default_title: "QuickSettings".to_string(),
            default_width: 32,
            title_bar_height: 1,
            grid_size: 4,
            double_click_ms: 400,
            title_bar_bg: (43, 43, 43),     // #2b2b2b
            title_bar_fg: (230, 230, 230),  // #e6e6e6
            content_bg: (21, 21, 21),       // #151515
            label_fg: (170, 170, 170),      // #aaaaaa
            accent: (63, 167, 214),         // #3fa7d6
            disabled_fg: (85, 85, 85),      // #555555
        }
    }
}

fn parse_config(content: &str) -> CompiledConfig {
    let mut config = CompiledConfig::default();

    // Line-oriented reader: nested keys are tracked by indentation as a dotted path
    // (e.g. `theme.colors.accent`), which is all src/config.yaml needs
    let mut sections: Vec<(usize, String)> = Vec::new();

    for line in content.lines() {
        let Some((indent, key, value)) = split_entry(line) else {
            continue;
        };
        while sections.last().is_some_and(|(depth, _)| *depth >= indent) {
            sections.pop();
        }
        let Some(value) = value else {
            sections.push((indent, key.to_string()));
            continue;
        };

        let path: Vec<&str> = sections.iter().map(|(_, name)| name.as_str()).chain([key]).collect();
        match path.join(".").as_str() {
            "panel.default_title" => config.default_title = unquote(value).to_string(),
            "panel.default_width" => config.default_width = value.parse().unwrap_or(config.default_width),
            "panel.title_bar_height" => config.title_bar_height = value.parse().unwrap_or(config.title_bar_height),
            "panel.grid_size" => config.grid_size = value.parse().unwrap_or(config.grid_size).max(1),
            "panel.double_click_ms" => config.double_click_ms = value.parse().unwrap_or(config.double_click_ms),
            "theme.colors.title_bar_bg" => set_color(&mut config.title_bar_bg, value),
            "theme.colors.title_bar_fg" => set_color(&mut config.title_bar_fg, value),
            "theme.colors.content_bg" => set_color(&mut config.content_bg, value),
            "theme.colors.label_fg" => set_color(&mut config.label_fg, value),
            "theme.colors.accent" => set_color(&mut config.accent, value),
            "theme.colors.disabled_fg" => set_color(&mut config.disabled_fg, value),
            other => println!("cargo:warning=unknown key in src/config.yaml: {other}"),
        }
    }

    config
}

/// (indent, key, value); value is None for a section header
fn split_entry(line: &str) -> Option<(usize, &str, Option<&str>)> {
    let body = line.trim_start();
    if body.is_empty() || body.starts_with('#') {
        return None;
    }
    let indent = line.len() - body.len();
    let (key, rest) = body.split_once(':')?;

    // A `#` opens a comment only after whitespace, so "#3fa7d6" survives
    let rest = match rest.find(" #") {
        Some(at) => &rest[..at],
        None => rest,
    };
    let value = Some(rest.trim()).filter(|v| !v.is_empty());
    Some((indent, key.trim(), value))
}

fn unquote(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

/// Leaves the default in place when the value is not `#rrggbb`
fn set_color(slot: &mut (u8, u8, u8), value: &str) {
    let hex = unquote(value).trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        println!("cargo:warning=ignoring color {value:?} in src/config.yaml");
        return;
    }
    let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => *slot = (r, g, b),
        _ => println!("cargo:warning=ignoring color {value:?} in src/config.yaml"),
    }
}
