// Button Control

use super::button_callback;
use crate::core::{ButtonRef, ControlData, ControlEntry, ControlKind, Panel, PanelResult, ValueCallback};

impl Panel {
    pub(crate) fn insert_button(&mut self, title: &str, callback: Option<ValueCallback>) -> PanelResult<&mut Self> {
        let entry = ControlEntry::new(title, ControlKind::Button, ControlData::Button).with_callback(callback);
        self.register(entry)
    }

    /// Add a button labelled with its title; the callback receives a reference to it
    pub fn add_button<F>(&mut self, title: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&ButtonRef) + 'static,
    {
        self.insert_button(title, Some(button_callback(callback)))
    }

    /// Click the button. Disabled buttons do nothing.
    pub fn press_button(&mut self, title: &str) -> PanelResult<&mut Self> {
        if self.control_of(title, &[ControlKind::Button])?.is_enabled() {
            self.notify(title);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::z_order::LocalZOrder;
    use crate::core::PanelError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn panel() -> Panel {
        Panel::create(0, 0, None).with_z_order(Rc::new(LocalZOrder::new()))
    }

    #[test]
    fn test_press_fires_with_reference() {
        let pressed = Rc::new(RefCell::new(Vec::new()));
        let sink = pressed.clone();
        let mut p = panel();
        p.add_button("Reset", move |b| sink.borrow_mut().push(b.title.clone())).unwrap();
        p.press_button("Reset").unwrap();
        p.press_button("Reset").unwrap();
        assert_eq!(pressed.borrow().len(), 2);
        assert_eq!(pressed.borrow()[0], "Reset");
    }

    #[test]
    fn test_disabled_button_ignores_press() {
        let pressed = Rc::new(RefCell::new(0));
        let sink = pressed.clone();
        let mut p = panel();
        p.add_button("Reset", move |_| *sink.borrow_mut() += 1).unwrap();
        p.disable_control("Reset").unwrap();
        p.press_button("Reset").unwrap();
        assert_eq!(*pressed.borrow(), 0);

        p.enable_control("Reset").unwrap();
        p.press_button("Reset").unwrap();
        assert_eq!(*pressed.borrow(), 1);
    }

    #[test]
    fn test_press_on_other_kind_fails() {
        let mut p = panel();
        p.add_boolean("On", true, |_| {}).unwrap();
        assert!(matches!(p.press_button("On"), Err(PanelError::KindMismatch { .. })));
    }
}
