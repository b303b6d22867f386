// Date & Time Controls
// `YYYY-MM-DD` and `HH:MM` fields with plain-text fallback

use std::cell::RefCell;
use std::rc::Rc;

use super::text_callback;
use crate::core::bind::bind_callback;
use crate::core::{
    BindTarget, ControlData, ControlEntry, ControlKind, Panel, PanelError, PanelResult, ValueCallback,
};
use crate::utilities::{canonical_date, canonical_time};

/// Canonicalize `input` for a date/time control, or keep it verbatim in fallback mode
fn normalize(kind: ControlKind, title: &str, input: &str, native: bool) -> PanelResult<String> {
    if !native {
        return Ok(input.trim().to_string());
    }
    let (canonical, expected) = match kind {
        ControlKind::Date => (canonical_date(input), "YYYY-MM-DD"),
        _ => (canonical_time(input), "HH:MM"),
    };
    canonical.ok_or_else(|| PanelError::invalid_value(title, format!("'{}' is not a {} value", input, expected)))
}

impl Panel {
    pub(crate) fn insert_temporal(
        &mut self,
        kind: ControlKind,
        title: &str,
        input: &str,
        callback: Option<ValueCallback>,
    ) -> PanelResult<&mut Self> {
        let native = self.honors(kind);
        let value = normalize(kind, title, input, native)?;
        let entry = ControlEntry::new(title, kind, ControlData::Text { value, rows: 1 })
            .with_callback(callback)
            .with_native(native);
        self.register(entry)
    }

    pub fn add_date<F>(&mut self, title: &str, date: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&str) + 'static,
    {
        self.insert_temporal(ControlKind::Date, title, date, Some(text_callback(callback)))
    }

    pub fn add_time<F>(&mut self, title: &str, time: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&str) + 'static,
    {
        self.insert_temporal(ControlKind::Time, title, time, Some(text_callback(callback)))
    }

    pub fn bind_date<T>(&mut self, title: &str, date: &str, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_temporal(ControlKind::Date, title, date, Some(callback))
    }

    pub fn bind_time<T>(&mut self, title: &str, time: &str, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_temporal(ControlKind::Time, title, time, Some(callback))
    }

    pub fn get_date(&self, title: &str) -> PanelResult<String> {
        self.text_value(title, ControlKind::Date)
    }

    pub fn get_time(&self, title: &str) -> PanelResult<String> {
        self.text_value(title, ControlKind::Time)
    }

    /// Set the date; callbacks receive the canonical `YYYY-MM-DD` string
    pub fn set_date(&mut self, title: &str, date: &str) -> PanelResult<&mut Self> {
        self.apply_temporal(ControlKind::Date, title, date)
    }

    /// Set the time; callbacks receive the canonical `HH:MM` string
    pub fn set_time(&mut self, title: &str, time: &str) -> PanelResult<&mut Self> {
        self.apply_temporal(ControlKind::Time, title, time)
    }

    fn apply_temporal(&mut self, kind: ControlKind, title: &str, input: &str) -> PanelResult<&mut Self> {
        let value = self.temporal_input(kind, title, input)?;
        self.apply_text(title, kind, value)
    }

    /// The text `set_date`/`set_time` would store
    pub(crate) fn temporal_input(&self, kind: ControlKind, title: &str, input: &str) -> PanelResult<String> {
        let native = self.control_of(title, &[kind])?.is_native();
        normalize(kind, title, input, native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::z_order::LocalZOrder;
    use crate::core::Capabilities;

    fn panel(capabilities: Capabilities) -> Panel {
        Panel::create(0, 0, None)
            .with_z_order(Rc::new(LocalZOrder::new()))
            .with_capabilities(capabilities)
    }

    #[test]
    fn test_date_callback_gets_canonical_value() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = seen.clone();
        let mut p = panel(Capabilities::all());
        p.add_date("Start", "2024-01-05", move |d| sink.borrow_mut().push(d.to_string()))
            .unwrap();
        p.set_date("Start", "2024-3-9").unwrap();
        assert_eq!(*seen.borrow(), vec!["2024-03-09".to_string()]);
        assert_eq!(p.get_date("Start").unwrap(), "2024-03-09");
    }

    #[test]
    fn test_time_canonical_form() {
        let mut p = panel(Capabilities::all());
        p.add_time("Alarm", "7:05", |_| {}).unwrap();
        assert_eq!(p.get_time("Alarm").unwrap(), "07:05");
        p.set_time("Alarm", "23:59:30").unwrap();
        assert_eq!(p.get_time("Alarm").unwrap(), "23:59");
        assert!(matches!(
            p.set_time("Alarm", "25:00"),
            Err(PanelError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_fallback_keeps_raw_text() {
        let mut p = panel(Capabilities::plain());
        p.add_date("Start", "next tuesday", |_| {}).unwrap();
        assert!(!p.control("Start").unwrap().is_native());
        assert_eq!(p.get_date("Start").unwrap(), "next tuesday");
    }
}
