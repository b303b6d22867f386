// Text Controls
// Single-line text, password and multi-line text area

use std::cell::RefCell;
use std::rc::Rc;

use super::text_callback;
use crate::core::bind::bind_callback;
use crate::core::{
    BindTarget, ControlData, ControlEntry, ControlKind, Panel, PanelError, PanelResult, ValueCallback,
};

/// Rows a text area gets unless told otherwise
pub const DEFAULT_TEXT_AREA_ROWS: u16 = 3;

impl Panel {
    /// Shared constructor for text, password and text area controls
    pub(crate) fn insert_text(
        &mut self,
        kind: ControlKind,
        title: &str,
        value: &str,
        callback: Option<ValueCallback>,
    ) -> PanelResult<&mut Self> {
        let rows = if kind == ControlKind::TextArea { DEFAULT_TEXT_AREA_ROWS } else { 1 };
        let entry = ControlEntry::new(
            title,
            kind,
            ControlData::Text {
                value: value.to_string(),
                rows,
            },
        )
        .with_callback(callback);
        self.register(entry)
    }

    pub fn add_text<F>(&mut self, title: &str, text: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&str) + 'static,
    {
        self.insert_text(ControlKind::Text, title, text, Some(text_callback(callback)))
    }

    /// Text field whose content is masked when rendered
    pub fn add_password<F>(&mut self, title: &str, text: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&str) + 'static,
    {
        self.insert_text(ControlKind::Password, title, text, Some(text_callback(callback)))
    }

    pub fn add_text_area<F>(&mut self, title: &str, text: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&str) + 'static,
    {
        self.insert_text(ControlKind::TextArea, title, text, Some(text_callback(callback)))
    }

    pub fn bind_text<T>(&mut self, title: &str, text: &str, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_text(ControlKind::Text, title, text, Some(callback))
    }

    pub fn bind_password<T>(&mut self, title: &str, text: &str, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_text(ControlKind::Password, title, text, Some(callback))
    }

    pub fn bind_text_area<T>(&mut self, title: &str, text: &str, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_text(ControlKind::TextArea, title, text, Some(callback))
    }

    pub fn get_text(&self, title: &str) -> PanelResult<String> {
        self.text_value(title, ControlKind::Text)
    }

    pub fn get_password(&self, title: &str) -> PanelResult<String> {
        self.text_value(title, ControlKind::Password)
    }

    pub fn get_text_area(&self, title: &str) -> PanelResult<String> {
        self.text_value(title, ControlKind::TextArea)
    }

    pub fn set_text(&mut self, title: &str, text: &str) -> PanelResult<&mut Self> {
        self.apply_text(title, ControlKind::Text, text.to_string())
    }

    pub fn set_password(&mut self, title: &str, text: &str) -> PanelResult<&mut Self> {
        self.apply_text(title, ControlKind::Password, text.to_string())
    }

    pub fn set_text_area(&mut self, title: &str, text: &str) -> PanelResult<&mut Self> {
        self.apply_text(title, ControlKind::TextArea, text.to_string())
    }

    /// Change the visible row count of a text area
    pub fn set_text_area_rows(&mut self, title: &str, rows: u16) -> PanelResult<&mut Self> {
        if rows == 0 {
            return Err(PanelError::invalid_value(title, "a text area needs at least one row"));
        }
        let entry = self.control_of_mut(title, &[ControlKind::TextArea])?;
        if let ControlData::Text { rows: current, .. } = &mut entry.data {
            *current = rows;
        }
        Ok(self)
    }

    /// Read the text of any text-backed control of `kind`
    pub(crate) fn text_value(&self, title: &str, kind: ControlKind) -> PanelResult<String> {
        match self.control_of(title, &[kind])?.data() {
            ControlData::Text { value, .. } => Ok(value.clone()),
            _ => unreachable!("text kinds always carry text data"),
        }
    }

    /// Store already-canonical text and fire callbacks
    pub(crate) fn apply_text(&mut self, title: &str, kind: ControlKind, text: String) -> PanelResult<&mut Self> {
        let entry = self.control_of_mut(title, &[kind])?;
        if let ControlData::Text { value, .. } = &mut entry.data {
            *value = text;
        }
        self.notify(title);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::z_order::LocalZOrder;
    use crate::core::{Capabilities, ControlValue};
    use std::collections::HashMap;

    fn panel() -> Panel {
        Panel::create(0, 0, None)
            .with_z_order(Rc::new(LocalZOrder::new()))
            .with_capabilities(Capabilities::all())
    }

    #[test]
    fn test_text_kinds_round_trip() {
        let mut p = panel();
        p.add_text("Name", "Ada", |_| {}).unwrap();
        p.add_password("Secret", "hunter2", |_| {}).unwrap();
        p.add_text_area("Notes", "line one\nline two", |_| {}).unwrap();

        assert_eq!(p.get_text("Name").unwrap(), "Ada");
        assert_eq!(p.get_password("Secret").unwrap(), "hunter2");
        assert_eq!(p.get_text_area("Notes").unwrap(), "line one\nline two");
    }

    #[test]
    fn test_set_text_fires_callback() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = seen.clone();
        let mut p = panel();
        p.add_text("Name", "", move |t| sink.borrow_mut().push(t.to_string())).unwrap();
        p.set_text("Name", "Grace").unwrap();
        assert_eq!(*seen.borrow(), vec!["Grace".to_string()]);
    }

    #[test]
    fn test_text_getters_check_kind() {
        let mut p = panel();
        p.add_password("Secret", "x", |_| {}).unwrap();
        assert!(matches!(p.get_text("Secret"), Err(PanelError::KindMismatch { .. })));
    }

    #[test]
    fn test_text_area_rows() {
        let mut p = panel();
        p.add_text_area("Notes", "", |_| {}).unwrap();
        p.set_text_area_rows("Notes", 6).unwrap();
        match p.control("Notes").unwrap().data() {
            ControlData::Text { rows, .. } => assert_eq!(*rows, 6),
            other => panic!("unexpected data {:?}", other),
        }
        assert!(p.set_text_area_rows("Notes", 0).is_err());
    }

    #[test]
    fn test_bind_text() {
        let target = Rc::new(RefCell::new(HashMap::<String, ControlValue>::new()));
        let mut p = panel();
        p.bind_text("Name", "a", target.clone()).unwrap();
        p.set_text("Name", "b").unwrap();
        assert_eq!(target.borrow().get("Name"), Some(&ControlValue::Text("b".to_string())));
    }
}
