// Boolean Control
// Checkbox rendered on a single row

use std::cell::RefCell;
use std::rc::Rc;

use super::bool_callback;
use crate::core::bind::bind_callback;
use crate::core::{BindTarget, ControlData, ControlEntry, ControlKind, Panel, PanelResult, ValueCallback};

const BOOLEAN: &[ControlKind] = &[ControlKind::Boolean];

impl Panel {
    pub(crate) fn insert_boolean(
        &mut self,
        title: &str,
        value: bool,
        callback: Option<ValueCallback>,
    ) -> PanelResult<&mut Self> {
        let entry = ControlEntry::new(title, ControlKind::Boolean, ControlData::Boolean(value))
            .with_callback(callback);
        self.register(entry)
    }

    pub fn add_boolean<F>(&mut self, title: &str, value: bool, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(bool) + 'static,
    {
        self.insert_boolean(title, value, Some(bool_callback(callback)))
    }

    pub fn bind_boolean<T>(&mut self, title: &str, value: bool, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_boolean(title, value, Some(callback))
    }

    pub fn get_boolean(&self, title: &str) -> PanelResult<bool> {
        match self.control_of(title, BOOLEAN)?.data() {
            ControlData::Boolean(value) => Ok(*value),
            _ => unreachable!("boolean controls always carry boolean data"),
        }
    }

    pub fn set_boolean(&mut self, title: &str, value: bool) -> PanelResult<&mut Self> {
        let entry = self.control_of_mut(title, BOOLEAN)?;
        entry.data = ControlData::Boolean(value);
        self.notify(title);
        Ok(self)
    }

    /// Flip a checkbox (pointer and keyboard input)
    pub(crate) fn toggle_boolean(&mut self, title: &str) -> PanelResult<&mut Self> {
        let current = self.get_boolean(title)?;
        self.set_boolean(title, !current)
    }
}
