// Element Control
// Hosts a caller-supplied widget

use crate::core::{ControlData, ControlEntry, ControlKind, Panel, PanelElement, PanelResult};

impl Panel {
    /// Add a custom element; it gets a title row and `element.height(width)` rows below
    pub fn add_element<E>(&mut self, title: &str, element: E) -> PanelResult<&mut Self>
    where
        E: PanelElement + 'static,
    {
        let entry = ControlEntry::new(title, ControlKind::Element, ControlData::Element(Box::new(element)));
        self.register(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::z_order::LocalZOrder;
    use crate::core::ControlValue;
    use ratatui::{buffer::Buffer, layout::Rect};
    use std::rc::Rc;

    struct Swatch;

    impl PanelElement for Swatch {
        fn height(&self, _width: u16) -> u16 {
            2
        }

        fn render(&self, area: Rect, buf: &mut Buffer) {
            buf.set_string(area.x, area.y, "##", ratatui::style::Style::default());
        }
    }

    #[test]
    fn test_element_has_no_value() {
        let mut p = Panel::create(0, 0, None).with_z_order(Rc::new(LocalZOrder::new()));
        p.add_element("Swatch", Swatch).unwrap();
        assert_eq!(p.get_value("Swatch").unwrap(), ControlValue::Empty);
        assert!(p.values_as_json().is_empty());
    }
}
