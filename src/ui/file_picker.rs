// File Picker Popup
// Modal list of files a file chooser accepts, drawn over the panels

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};
use std::path::{Path, PathBuf};

use crate::core::PanelResult;
use crate::desktop::{Desktop, PanelId};
use super::Styles;

/// Result of feeding a key to the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Chosen(PathBuf),
    Cancelled,
}

/// Open picker for one file chooser control
#[derive(Debug)]
pub struct FilePicker {
    pub panel: PanelId,
    pub control: String,
    root: PathBuf,
    entries: Vec<PathBuf>,
    selected: usize,
}

impl FilePicker {
    /// List the candidates under `root` for the chooser `control` of `panel`
    pub fn open(desktop: &Desktop, panel: PanelId, control: &str, root: &Path) -> PanelResult<Self> {
        let entries = match desktop.panel(panel) {
            Some(p) => p.list_file_candidates(control, root)?,
            None => Vec::new(),
        };
        Ok(Self {
            panel,
            control: control.to_string(),
            root: root.to_path_buf(),
            entries,
            selected: 0,
        })
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&Path> {
        self.entries.get(self.selected).map(PathBuf::as_path)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PickerOutcome {
        match code {
            KeyCode::Esc => PickerOutcome::Cancelled,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                PickerOutcome::Pending
            }
            KeyCode::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
                PickerOutcome::Pending
            }
            KeyCode::Enter => match self.selected() {
                Some(path) => PickerOutcome::Chosen(path.to_path_buf()),
                None => PickerOutcome::Cancelled,
            },
            _ => PickerOutcome::Pending,
        }
    }

    /// Draw the picker centered in `area`
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = centered(area, 60, 16);
        f.render_widget(Clear, popup);

        let items: Vec<ListItem> = if self.entries.is_empty() {
            vec![ListItem::new(Line::from(Span::styled("(no matching files)", Styles::disabled())))]
        } else {
            self.entries
                .iter()
                .map(|path| {
                    let shown = path.strip_prefix(&self.root).unwrap_or(path);
                    ListItem::new(Line::from(Span::styled(shown.display().to_string(), Styles::content())))
                })
                .collect()
        };

        let list = List::new(items)
            .style(Styles::content())
            .highlight_style(Styles::picker_selected())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::picker_border())
                    .title(Span::styled(format!(" {} ", self.control), Styles::picker_border())),
            );

        let mut state = ListState::default();
        if !self.entries.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, popup, &mut state);
    }
}

/// Rectangle of at most `width` x `height` centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Capabilities, LocalZOrder};
    use std::fs;
    use std::rc::Rc;

    fn desktop_with_chooser() -> (Desktop, PanelId) {
        let mut desktop = Desktop::with_z_order(Rc::new(LocalZOrder::new())).with_capabilities(Capabilities::all());
        let id = desktop.create_panel(0, 0, Some("Files"));
        desktop
            .panel_mut(id)
            .unwrap()
            .add_file_chooser("Config", "Pick", "*.json", |_| {})
            .unwrap();
        (desktop, id)
    }

    #[test]
    fn test_picker_lists_and_chooses() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let (desktop, id) = desktop_with_chooser();
        let mut picker = FilePicker::open(&desktop, id, "Config", dir.path()).unwrap();
        assert_eq!(picker.entries().len(), 2);

        assert_eq!(picker.handle_key(KeyCode::Down), PickerOutcome::Pending);
        assert_eq!(picker.handle_key(KeyCode::Down), PickerOutcome::Pending);
        assert_eq!(picker.handle_key(KeyCode::Enter), PickerOutcome::Chosen(dir.path().join("b.json")));
    }

    #[test]
    fn test_empty_picker_cancels_on_enter() {
        let dir = tempfile::tempdir().unwrap();
        let (desktop, id) = desktop_with_chooser();
        let mut picker = FilePicker::open(&desktop, id, "Config", dir.path()).unwrap();
        assert!(picker.selected().is_none());
        assert_eq!(picker.handle_key(KeyCode::Enter), PickerOutcome::Cancelled);
    }

    #[test]
    fn test_centered_fits_small_areas() {
        let rect = centered(Rect::new(0, 0, 20, 10), 60, 16);
        assert_eq!(rect, Rect::new(0, 0, 20, 10));
        let rect = centered(Rect::new(0, 0, 100, 40), 60, 16);
        assert_eq!(rect, Rect::new(20, 12, 60, 16));
    }
}
