// Panel Interaction
// Pointer and keyboard input routed to drag, collapse, focus and control edits

use crossterm::event::{KeyCode, KeyModifiers};
use tracing::{debug, warn};

use super::control::{ControlData, ControlKind, ControlValue};
use super::error::PanelError;
use super::layout::{ControlSlot, Hit, PanelLayout};
use super::panel::{EditBuffer, Panel};
use crate::utilities::format_number;

/// Outcome of feeding one input event to a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The event was not for this panel
    Ignored,
    /// The panel consumed the event
    Handled,
    /// A file chooser was activated; the host should open a picker for this title
    ChooseFile(String),
}

impl Interaction {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Interaction::Ignored)
    }
}

/// Kinds edited through the panel's edit buffer
fn is_editable(kind: ControlKind) -> bool {
    kind.is_text_like() || kind == ControlKind::Number
}

impl Panel {
    // === Pointer ===

    /// Pointer pressed at a screen cell
    pub fn pointer_down(&mut self, column: i32, row: i32) -> Interaction {
        if self.is_hidden() {
            return Interaction::Ignored;
        }
        let (x, y) = self.position();
        let layout = PanelLayout::compute(self);

        match layout.hit(column - x, row - y) {
            Hit::TitleBar => {
                self.commit_edit();
                self.begin_drag(column, row);
                Interaction::Handled
            }
            Hit::Control(slot) => self.click_control(slot, column - x, row - y),
            Hit::Content => {
                self.commit_edit();
                Interaction::Handled
            }
            Hit::Outside => Interaction::Ignored,
        }
    }

    /// Pointer moved; only matters while dragging
    pub fn pointer_move(&mut self, column: i32, row: i32) -> Interaction {
        if self.is_dragging() {
            self.drag_to(column, row);
            Interaction::Handled
        } else {
            Interaction::Ignored
        }
    }

    /// Pointer released; ends a drag
    pub fn pointer_up(&mut self, _column: i32, _row: i32) -> Interaction {
        if self.is_dragging() {
            self.end_drag();
            Interaction::Handled
        } else {
            Interaction::Ignored
        }
    }

    /// Double-click on the title bar toggles collapse; elsewhere it acts as a click
    pub fn double_click(&mut self, column: i32, row: i32) -> Interaction {
        if self.is_hidden() {
            return Interaction::Ignored;
        }
        let (x, y) = self.position();
        let on_title = matches!(PanelLayout::compute(self).hit(column - x, row - y), Hit::TitleBar);
        if !on_title {
            return self.pointer_down(column, row);
        }
        if self.is_collapsible() {
            self.toggle_collapsed();
        }
        Interaction::Handled
    }

    fn click_control(&mut self, slot: &ControlSlot, local_column: i32, local_row: i32) -> Interaction {
        let title = slot.title.as_str();
        let enabled = self.control(title).map(|e| e.is_enabled()).unwrap_or(false);
        if !enabled {
            return Interaction::Handled;
        }
        if self.edit.as_ref().is_some_and(|e| e.title != title) {
            self.commit_edit();
        }
        if slot.kind.is_focusable() {
            self.focus = Some(title.to_string());
        }

        let result = match slot.kind {
            ControlKind::Boolean => self.toggle_boolean(title).map(|_| ()),
            ControlKind::Button => self.press_button(title).map(|_| ()),
            ControlKind::Range if slot.widget.height > 0 && local_row >= i32::from(slot.widget.y) => {
                let span = f64::from(slot.widget.width.saturating_sub(1).max(1));
                let fraction = f64::from(local_column - i32::from(slot.widget.x)) / span;
                self.set_numeric_fraction(title, fraction).map(|_| ())
            }
            ControlKind::DropDown => self.cycle_drop_down(title, 1).map(|_| ()),
            ControlKind::FileChooser => return Interaction::ChooseFile(title.to_string()),
            kind if is_editable(kind) => {
                self.begin_edit(title);
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            warn!(%title, %err, "control click failed");
        }
        Interaction::Handled
    }

    // === Keyboard ===

    /// Key pressed while this panel is active
    pub fn key_down(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Interaction {
        if self.is_hidden() {
            return Interaction::Ignored;
        }
        if self.edit.is_some() {
            return self.edit_key(code, modifiers);
        }

        match code {
            KeyCode::Tab => {
                self.move_focus(1);
                return Interaction::Handled;
            }
            KeyCode::BackTab => {
                self.move_focus(-1);
                return Interaction::Handled;
            }
            _ => {}
        }

        let Some(title) = self.focus.clone() else {
            return Interaction::Ignored;
        };
        let Some((kind, enabled)) = self.controls().get(&title).map(|e| (e.kind(), e.is_enabled())) else {
            self.focus = None;
            return Interaction::Ignored;
        };
        if !enabled || self.is_collapsed() {
            return Interaction::Ignored;
        }
        let activate = matches!(code, KeyCode::Enter | KeyCode::Char(' '));

        let result = match (kind, code) {
            (ControlKind::Range | ControlKind::Number, KeyCode::Left | KeyCode::Down) => {
                self.step_numeric(&title, -1).map(|_| ())
            }
            (ControlKind::Range | ControlKind::Number, KeyCode::Right | KeyCode::Up) => {
                self.step_numeric(&title, 1).map(|_| ())
            }
            (ControlKind::Number, KeyCode::Enter) => {
                self.begin_edit(&title);
                Ok(())
            }
            (ControlKind::DropDown, KeyCode::Left | KeyCode::Up) => self.cycle_drop_down(&title, -1).map(|_| ()),
            (ControlKind::DropDown, KeyCode::Right | KeyCode::Down) => self.cycle_drop_down(&title, 1).map(|_| ()),
            (ControlKind::Boolean, _) if activate => self.toggle_boolean(&title).map(|_| ()),
            (ControlKind::Button, _) if activate => self.press_button(&title).map(|_| ()),
            (ControlKind::FileChooser, _) if activate => return Interaction::ChooseFile(title),
            (kind, KeyCode::Enter) if kind.is_text_like() => {
                self.begin_edit(&title);
                Ok(())
            }
            _ => return Interaction::Ignored,
        };
        if let Err(err) = result {
            warn!(%title, %err, "key action failed");
        }
        Interaction::Handled
    }

    fn edit_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Interaction {
        let Some(title) = self.edit.as_ref().map(|e| e.title.clone()) else {
            return Interaction::Ignored;
        };
        let multiline = self
            .controls()
            .get(&title)
            .is_some_and(|e| e.kind() == ControlKind::TextArea);

        match code {
            KeyCode::Esc => {
                debug!(%title, "edit cancelled");
                self.edit = None;
            }
            KeyCode::Enter if multiline => self.edit_text(|text| text.push('\n')),
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Tab => {
                self.commit_edit();
                if self.edit.is_none() {
                    self.move_focus(1);
                }
            }
            KeyCode::Backspace => self.edit_text(|text| {
                text.pop();
            }),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => self.edit_text(|text| text.push(c)),
            _ => {}
        }
        Interaction::Handled
    }

    fn edit_text<F: FnOnce(&mut String)>(&mut self, change: F) {
        if let Some(edit) = self.edit.as_mut() {
            change(&mut edit.text);
        }
    }

    // === Focus & editing ===

    /// Title of the focused control
    pub fn focused(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Focus a control by title
    pub fn focus_control(&mut self, title: &str) -> bool {
        let focusable = self
            .controls()
            .get(title)
            .is_some_and(|e| e.kind().is_focusable() && e.is_visible() && e.is_enabled());
        if focusable {
            if self.edit.as_ref().is_some_and(|e| e.title != title) {
                self.commit_edit();
            }
            self.focus = Some(title.to_string());
        }
        focusable
    }

    /// `(title, text)` of the control being edited
    pub fn editing(&self) -> Option<(&str, &str)> {
        self.edit.as_ref().map(|e| (e.title.as_str(), e.text.as_str()))
    }

    fn move_focus(&mut self, delta: i32) {
        let candidates: Vec<String> = self
            .controls()
            .iter()
            .filter(|e| e.kind().is_focusable() && e.is_visible() && e.is_enabled())
            .map(|e| e.title().to_string())
            .collect();
        if candidates.is_empty() {
            self.focus = None;
            return;
        }

        let len = candidates.len() as i32;
        let next = match self.focus.as_ref().and_then(|f| candidates.iter().position(|c| c == f)) {
            Some(current) => (current as i32 + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.focus = Some(candidates[next as usize].clone());
    }

    fn begin_edit(&mut self, title: &str) {
        let text = match self.control(title).map(|e| e.data()) {
            Ok(ControlData::Text { value, .. }) => value.clone(),
            Ok(ControlData::Numeric { value, .. }) => format_number(*value),
            _ => return,
        };
        self.edit = Some(EditBuffer {
            title: title.to_string(),
            text,
        });
    }

    /// Apply the edit buffer; invalid input leaves the buffer open
    pub(crate) fn commit_edit(&mut self) {
        let Some(edit) = self.edit.take() else {
            return;
        };
        let Ok(kind) = self.control(&edit.title).map(|e| e.kind()) else {
            return;
        };

        let result = if kind == ControlKind::Number {
            match edit.text.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => self.set_number_value(&edit.title, n).map(|_| ()),
                _ => Err(PanelError::invalid_value(&edit.title, "not a number")),
            }
        } else {
            self.set_value(&edit.title, ControlValue::Text(edit.text.clone())).map(|_| ())
        };

        if let Err(err) = result {
            warn!(title = %edit.title, %err, "edit rejected");
            self.edit = Some(edit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app_config::TITLE_BAR_HEIGHT;
    use crate::core::z_order::LocalZOrder;
    use crate::core::Capabilities;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TOP: i32 = TITLE_BAR_HEIGHT as i32;

    fn panel() -> Panel {
        let mut p = Panel::create(10, 5, Some("Input"))
            .with_z_order(Rc::new(LocalZOrder::new()))
            .with_capabilities(Capabilities::all());
        p.set_width(20);
        p
    }

    #[test]
    fn test_title_bar_drag_through_pointer_events() {
        let mut p = panel();
        assert_eq!(p.pointer_down(12, 5), Interaction::Handled);
        assert!(p.is_dragging());
        assert_eq!(p.pointer_move(20, 9), Interaction::Handled);
        assert_eq!(p.pointer_up(20, 9), Interaction::Handled);
        assert_eq!(p.position(), (18, 9));
        assert_eq!(p.pointer_move(30, 30), Interaction::Ignored);
    }

    #[test]
    fn test_outside_is_ignored() {
        let mut p = panel();
        assert_eq!(p.pointer_down(0, 0), Interaction::Ignored);
        p.hide();
        assert_eq!(p.pointer_down(12, 5), Interaction::Ignored);
    }

    #[test]
    fn test_double_click_title_toggles_collapse() {
        let mut p = panel();
        p.double_click(12, 5);
        assert!(p.is_collapsed());
        p.double_click(12, 5);
        assert!(!p.is_collapsed());

        p.set_collapsible(false);
        p.double_click(12, 5);
        assert!(!p.is_collapsed());
    }

    #[test]
    fn test_click_toggles_checkbox() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut p = panel();
        p.add_boolean("On", false, move |v| sink.borrow_mut().push(v)).unwrap();
        assert_eq!(p.pointer_down(12, 5 + TOP), Interaction::Handled);
        assert_eq!(*seen.borrow(), vec![true]);
        assert_eq!(p.focused(), Some("On"));
    }

    #[test]
    fn test_disabled_control_ignores_click() {
        let mut p = panel();
        p.add_boolean("On", false, |_| {}).unwrap();
        p.disable_control("On").unwrap();
        p.pointer_down(12, 5 + TOP);
        assert!(!p.get_boolean("On").unwrap());
    }

    #[test]
    fn test_click_on_range_track_sets_value() {
        let mut p = panel();
        p.add_range("Speed", 0.0, 10.0, 5.0, 1.0, |_| {}).unwrap();
        // track spans panel columns 1..=18
        p.pointer_down(10 + 18, 5 + TOP + 1);
        assert_eq!(p.get_range_value("Speed").unwrap(), 10.0);
        p.pointer_down(10 + 1, 5 + TOP + 1);
        assert_eq!(p.get_range_value("Speed").unwrap(), 0.0);
    }

    #[test]
    fn test_file_chooser_requests_picker() {
        let mut p = panel();
        p.add_file_chooser("Config", "Open", ".json", |_| {}).unwrap();
        assert_eq!(
            p.pointer_down(12, 5 + TOP + 1),
            Interaction::ChooseFile("Config".to_string())
        );
        assert_eq!(
            p.key_down(KeyCode::Enter, KeyModifiers::NONE),
            Interaction::ChooseFile("Config".to_string())
        );
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut p = panel();
        p.add_info("About", "text").unwrap();
        p.add_boolean("A", true, |_| {}).unwrap();
        p.add_button("B", |_| {}).unwrap();
        p.add_boolean("C", true, |_| {}).unwrap();
        p.disable_control("C").unwrap();

        p.key_down(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(p.focused(), Some("A"));
        p.key_down(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(p.focused(), Some("B"));
        p.key_down(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(p.focused(), Some("A"));
        p.key_down(KeyCode::BackTab, KeyModifiers::NONE);
        assert_eq!(p.focused(), Some("B"));
    }

    #[test]
    fn test_arrow_keys_step_numeric() {
        let mut p = panel();
        p.add_range("Speed", 0.0, 10.0, 5.0, 1.0, |_| {}).unwrap();
        p.focus_control("Speed");
        p.key_down(KeyCode::Right, KeyModifiers::NONE);
        p.key_down(KeyCode::Right, KeyModifiers::NONE);
        p.key_down(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(p.get_range_value("Speed").unwrap(), 6.0);
    }

    #[test]
    fn test_text_edit_commit_and_cancel() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = seen.clone();
        let mut p = panel();
        p.add_text("Name", "Ad", move |t| sink.borrow_mut().push(t.to_string())).unwrap();
        p.focus_control("Name");

        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(p.editing(), Some(("Name", "Ad")));
        p.key_down(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(seen.borrow().is_empty());
        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(p.editing(), None);
        assert_eq!(*seen.borrow(), vec!["Ada".to_string()]);

        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        p.key_down(KeyCode::Backspace, KeyModifiers::NONE);
        p.key_down(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(p.get_text("Name").unwrap(), "Ada");
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_invalid_date_edit_stays_open() {
        let mut p = panel();
        p.add_date("Start", "2024-01-01", |_| {}).unwrap();
        p.focus_control("Start");
        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        for _ in 0..10 {
            p.key_down(KeyCode::Backspace, KeyModifiers::NONE);
        }
        for c in "soon".chars() {
            p.key_down(KeyCode::Char(c), KeyModifiers::NONE);
        }
        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(p.editing(), Some(("Start", "soon")));
        assert_eq!(p.get_date("Start").unwrap(), "2024-01-01");
    }

    #[test]
    fn test_number_edit_parses() {
        let mut p = panel();
        p.add_number("Count", 0.0, 100.0, 4.0, 1.0, |_| {}).unwrap();
        p.focus_control("Count");
        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        p.key_down(KeyCode::Char('2'), KeyModifiers::NONE);
        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(p.get_number_value("Count").unwrap(), 42.0);
    }

    #[test]
    fn test_text_area_enter_inserts_newline() {
        let mut p = panel();
        p.add_text_area("Notes", "a", |_| {}).unwrap();
        p.focus_control("Notes");
        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        p.key_down(KeyCode::Enter, KeyModifiers::NONE);
        p.key_down(KeyCode::Char('b'), KeyModifiers::NONE);
        p.key_down(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(p.get_text_area("Notes").unwrap(), "a\nb");
    }
}
