// Info Control
// Read-only wrapped text

use crate::core::{ControlData, ControlEntry, ControlKind, Panel, PanelResult};

const INFO: &[ControlKind] = &[ControlKind::Info];

impl Panel {
    pub fn add_info(&mut self, title: &str, text: &str) -> PanelResult<&mut Self> {
        let entry = ControlEntry::new(title, ControlKind::Info, ControlData::Info(text.to_string()));
        self.register(entry)
    }

    /// Alias of `add_info`; markup is shown as plain text
    pub fn add_html(&mut self, title: &str, text: &str) -> PanelResult<&mut Self> {
        self.add_info(title, text)
    }

    pub fn get_info(&self, title: &str) -> PanelResult<String> {
        match self.control_of(title, INFO)?.data() {
            ControlData::Info(text) => Ok(text.clone()),
            _ => unreachable!("info controls always carry text"),
        }
    }

    pub fn set_info(&mut self, title: &str, text: &str) -> PanelResult<&mut Self> {
        self.control_of_mut(title, INFO)?.data = ControlData::Info(text.to_string());
        Ok(self)
    }
}
