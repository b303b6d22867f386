// Color Control
// Hex color with a swatch; degrades to a plain text field without RGB support

use std::cell::RefCell;
use std::rc::Rc;

use super::text_callback;
use crate::core::bind::bind_callback;
use crate::core::{
    BindTarget, ControlData, ControlEntry, ControlKind, Panel, PanelError, PanelResult, ValueCallback,
};
use crate::utilities::canonical_color;

impl Panel {
    pub(crate) fn insert_color(
        &mut self,
        title: &str,
        color: &str,
        callback: Option<ValueCallback>,
    ) -> PanelResult<&mut Self> {
        let native = self.honors(ControlKind::Color);
        let value = if native {
            canonical_color(color)
                .ok_or_else(|| PanelError::invalid_value(title, format!("'{}' is not a hex color", color)))?
        } else {
            color.trim().to_string()
        };
        let entry = ControlEntry::new(title, ControlKind::Color, ControlData::Text { value, rows: 1 })
            .with_callback(callback)
            .with_native(native);
        self.register(entry)
    }

    /// Add a color control holding `#rrggbb`
    pub fn add_color<F>(&mut self, title: &str, color: &str, callback: F) -> PanelResult<&mut Self>
    where
        F: FnMut(&str) + 'static,
    {
        self.insert_color(title, color, Some(text_callback(callback)))
    }

    pub fn bind_color<T>(&mut self, title: &str, color: &str, target: Rc<RefCell<T>>) -> PanelResult<&mut Self>
    where
        T: BindTarget + 'static,
    {
        let callback = bind_callback(title, target);
        self.insert_color(title, color, Some(callback))
    }

    pub fn get_color(&self, title: &str) -> PanelResult<String> {
        self.text_value(title, ControlKind::Color)
    }

    /// Set the color; native editors accept `#rgb`/`#rrggbb` and store lowercase `#rrggbb`
    pub fn set_color(&mut self, title: &str, color: &str) -> PanelResult<&mut Self> {
        let value = self.color_input(title, color)?;
        self.apply_text(title, ControlKind::Color, value)
    }

    /// The text `set_color` would store
    pub(crate) fn color_input(&self, title: &str, color: &str) -> PanelResult<String> {
        if self.control_of(title, &[ControlKind::Color])?.is_native() {
            canonical_color(color)
                .ok_or_else(|| PanelError::invalid_value(title, format!("'{}' is not a hex color", color)))
        } else {
            Ok(color.trim().to_string())
        }
    }
}
