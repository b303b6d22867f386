// QuickSettings
// Interactive host that loads panel descriptors and runs them in the terminal

// MODULES ------------------>>

mod config;
mod config_validation;

//--------------------------------------------------------<<
// IMPORTS ------------------>>

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use config_validation::{load_and_validate_config, ValidatedConfig};
use quick_settings::descriptor::{CallbackScope, PanelDescriptor};
use quick_settings::ui::{run_desktop, Styles, Theme};
use quick_settings::{ControlValue, Desktop};

//--------------------------------------------------------<<

/// Shown when the host config lists no descriptors
const DEMO_DESCRIPTOR: &str = include_str!("../demos/settings.yaml");

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let validated = load_and_validate_config(config_path)?;
    init_logging(&validated.config.log_file)?;
    for warning in &validated.warnings {
        warn!("{}", warning);
    }

    if let Some(theme_path) = &validated.config.theme {
        let theme = Theme::load(theme_path)
            .with_context(|| format!("Failed to load theme: {}", theme_path.display()))?;
        Styles::use_external_theme(theme)?;
    }

    let mut desktop = build_desktop(&validated)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if validated.config.mouse {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = run_desktop(&mut terminal, &mut desktop, &validated.config.picker_root);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    outcome?;

    let values = serde_json::to_string_pretty(&desktop.values_as_json())?;
    println!("{}", values);
    Ok(())
}

/// Route tracing output to the log file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

/// Named callbacks descriptors may refer to
fn host_scope() -> CallbackScope {
    let mut scope = CallbackScope::new();
    scope
        .register("log", |value: &ControlValue| info!(?value, "value changed"))
        .register("apply", |_: &ControlValue| info!("apply pressed"));
    scope
}

fn build_desktop(validated: &ValidatedConfig) -> Result<Desktop> {
    let scope = host_scope();
    let mut desktop = Desktop::new();

    let descriptors = if validated.config.descriptors.is_empty() {
        vec![DEMO_DESCRIPTOR
            .parse::<PanelDescriptor>()
            .context("Failed to parse the built-in demo descriptor")?]
    } else {
        validated
            .config
            .descriptors
            .iter()
            .map(|path| {
                PanelDescriptor::load(path).with_context(|| format!("Failed to load descriptor: {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?
    };

    for descriptor in &descriptors {
        let (id, report) = desktop.build(descriptor, &scope)?;
        for skipped in &report.skipped {
            warn!(error = %skipped, "descriptor entry skipped");
        }
        if let Some(panel) = desktop.panel_mut(id) {
            panel.set_global_change_handler(|title, value| debug!(%title, ?value, "panel changed"));
            if let Some(key) = validated.toggle_key {
                panel.set_key(key);
            }
        }
    }

    Ok(desktop)
}
