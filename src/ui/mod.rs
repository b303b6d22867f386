// UI module
// Rendering for panels and the interactive event loop

pub mod control_view;
pub mod file_picker;
pub mod panel_view;
pub mod styles;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::Paragraph, Frame, Terminal};
use std::io::Stdout;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::{EventHandler, Interaction};
use crate::desktop::Desktop;

pub use file_picker::{FilePicker, PickerOutcome};
pub use panel_view::{blit, render_desktop, render_panel};
pub use styles::{ensure_theme, theme, Styles, Theme};

const HINT: &str = " drag title bar · double-click collapse · Tab focus · Enter edit · q quit ";

/// Run the interactive loop until the user quits
/// File choosers open a picker over `picker_root`.
pub fn run_desktop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    desktop: &mut Desktop,
    picker_root: &Path,
) -> Result<()> {
    let mut handler = EventHandler::new();
    let mut picker: Option<FilePicker> = None;

    loop {
        terminal.draw(|f| render_screen(f, desktop, picker.as_ref()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let event = event::read()?;

        if let Some(open) = picker.as_mut() {
            if let Event::Key(key) = event {
                if key.kind == KeyEventKind::Press {
                    let outcome = open.handle_key(key.code);
                    if finish_pick(desktop, open, outcome) {
                        picker = None;
                    }
                }
            }
            continue;
        }

        if let Event::Key(key) = event {
            if is_quit(&key, is_editing(desktop)) {
                return Ok(());
            }
        }

        for panel_event in handler.handle(event) {
            if let Interaction::ChooseFile(control) = desktop.dispatch(&panel_event) {
                let Some(panel) = desktop.active() else {
                    continue;
                };
                match FilePicker::open(desktop, panel, &control, picker_root) {
                    Ok(open) => picker = Some(open),
                    Err(e) => warn!(%control, error = %e, "cannot list files for chooser"),
                }
            }
        }
    }
}

fn render_screen(f: &mut Frame, desktop: &Desktop, picker: Option<&FilePicker>) {
    render_desktop(f, desktop);

    let area = f.area();
    if area.height > 0 {
        let hint = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        f.render_widget(Paragraph::new(HINT).style(Styles::label()), hint);
    }

    if let Some(picker) = picker {
        picker.render(f, area);
    }
}

/// Apply a picker outcome; true when the picker should close
fn finish_pick(desktop: &mut Desktop, picker: &FilePicker, outcome: PickerOutcome) -> bool {
    match outcome {
        PickerOutcome::Pending => false,
        PickerOutcome::Cancelled => {
            debug!(control = %picker.control, "file picker cancelled");
            true
        }
        PickerOutcome::Chosen(path) => {
            if let Some(panel) = desktop.panel_mut(picker.panel) {
                if let Err(e) = panel.choose_file(&picker.control, &path) {
                    warn!(control = %picker.control, error = %e, "chosen file rejected");
                }
            }
            true
        }
    }
}

/// Ctrl+C always quits; `q` and Esc belong to the edit buffer while editing
fn is_quit(key: &KeyEvent, editing: bool) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('q') | KeyCode::Esc => !editing,
        _ => false,
    }
}

fn is_editing(desktop: &Desktop) -> bool {
    desktop.panels_bottom_to_top().iter().any(|p| p.editing().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit(&q, false));
        assert!(!is_quit(&q, true));
        assert!(is_quit(&ctrl_c, true));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE), false));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), false));
    }
}
