// Panel Layout
// Panel-local rectangles for the title bar, content area and each control
// Used both for rendering and for hit testing pointer events.

use ratatui::layout::Rect;

use super::app_config::TITLE_BAR_HEIGHT;
use super::control::{ControlData, ControlEntry, ControlKind};
use super::panel::Panel;

/// Rows taken by the content area's bottom border
const CONTENT_BORDER_ROWS: u16 = 1;
/// Columns taken by the content area's side borders
const CONTENT_BORDER_COLUMNS: u16 = 2;

/// Where one control sits inside the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSlot {
    pub title: String,
    pub kind: ControlKind,
    /// Whole slot, label included
    pub area: Rect,
    pub label: Option<Rect>,
    /// Interactive part of the slot
    pub widget: Rect,
}

/// Result of hit testing a panel-local point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit<'a> {
    TitleBar,
    Control(&'a ControlSlot),
    Content,
    Outside,
}

/// Computed rectangles of a panel, relative to its top-left corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub bounds: Rect,
    pub title_bar: Rect,
    /// Absent while collapsed
    pub content: Option<Rect>,
    /// Content minus borders
    pub inner: Option<Rect>,
    pub slots: Vec<ControlSlot>,
}

impl PanelLayout {
    /// Lay out a panel's title bar and visible controls
    pub fn compute(panel: &Panel) -> Self {
        let width = panel.width();
        let bounds = Rect::new(0, 0, width, panel.height());
        let title_bar = Rect::new(0, 0, width, TITLE_BAR_HEIGHT.min(bounds.height));

        if panel.is_collapsed() {
            return Self {
                bounds,
                title_bar,
                content: None,
                inner: None,
                slots: Vec::new(),
            };
        }

        let content = Rect::new(0, TITLE_BAR_HEIGHT, width, panel.content_height());
        let inner = Rect::new(
            1,
            content.y,
            width.saturating_sub(CONTENT_BORDER_COLUMNS),
            content.height.saturating_sub(CONTENT_BORDER_ROWS),
        );

        let mut slots = Vec::new();
        let mut y = inner.y;
        let bottom = inner.y + inner.height;

        for entry in panel.controls().iter().filter(|e| e.is_visible()) {
            if y >= bottom {
                break;
            }
            let height = control_height(entry, inner.width).min(bottom - y);
            let area = Rect::new(inner.x, y, inner.width, height);
            let (label, widget) = if has_label_row(entry.kind()) && height > 1 {
                (
                    Some(Rect::new(area.x, area.y, area.width, 1)),
                    Rect::new(area.x, area.y + 1, area.width, height - 1),
                )
            } else if has_label_row(entry.kind()) {
                (Some(area), Rect::new(area.x, area.y + 1, area.width, 0))
            } else {
                (None, area)
            };

            slots.push(ControlSlot {
                title: entry.title().to_string(),
                kind: entry.kind(),
                area,
                label,
                widget,
            });
            y += height;
        }

        Self {
            bounds,
            title_bar,
            content: Some(content),
            inner: Some(inner),
            slots,
        }
    }

    /// Hit test a panel-local point
    pub fn hit(&self, column: i32, row: i32) -> Hit<'_> {
        if !contains(self.bounds, column, row) {
            return Hit::Outside;
        }
        if contains(self.title_bar, column, row) {
            return Hit::TitleBar;
        }
        if let Some(slot) = self.slots.iter().find(|s| contains(s.area, column, row)) {
            return Hit::Control(slot);
        }
        if self.content.is_some() {
            Hit::Content
        } else {
            Hit::Outside
        }
    }

    pub fn slot(&self, title: &str) -> Option<&ControlSlot> {
        self.slots.iter().find(|s| s.title == title)
    }
}

fn contains(rect: Rect, column: i32, row: i32) -> bool {
    column >= i32::from(rect.x)
        && column < i32::from(rect.x) + i32::from(rect.width)
        && row >= i32::from(rect.y)
        && row < i32::from(rect.y) + i32::from(rect.height)
}

/// Buttons and checkboxes carry their title on the widget row itself
fn has_label_row(kind: ControlKind) -> bool {
    !matches!(kind, ControlKind::Boolean | ControlKind::Button)
}

/// Rows a control needs at the given inner width
pub fn control_height(entry: &ControlEntry, inner_width: u16) -> u16 {
    match (entry.kind(), entry.data()) {
        (ControlKind::Boolean, _) | (ControlKind::Button, _) => 1,
        (_, ControlData::Text { rows, .. }) if entry.kind() == ControlKind::TextArea => 1 + (*rows).max(1),
        (_, ControlData::Info(text)) => 1 + wrapped_line_count(text, inner_width),
        (_, ControlData::Element(element)) => 1 + element.height(inner_width),
        _ => 2,
    }
}

/// Natural content height: visible controls plus the bottom border
pub fn natural_content_height(panel: &Panel) -> u16 {
    let inner_width = panel.width().saturating_sub(CONTENT_BORDER_COLUMNS);
    panel
        .controls()
        .iter()
        .filter(|e| e.is_visible())
        .map(|e| control_height(e, inner_width))
        .fold(CONTENT_BORDER_ROWS, u16::saturating_add)
}

/// Lines `text` occupies when wrapped at `width` columns
pub fn wrapped_line_count(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let lines: usize = text
        .split('\n')
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum();
    lines.clamp(1, usize::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::z_order::LocalZOrder;
    use crate::core::Capabilities;
    use std::rc::Rc;

    fn panel() -> Panel {
        Panel::create(0, 0, Some("Layout"))
            .with_z_order(Rc::new(LocalZOrder::new()))
            .with_capabilities(Capabilities::all())
    }

    #[test]
    fn test_slots_stack_in_order() {
        let mut p = panel();
        p.set_width(20);
        p.add_range("Speed", 0.0, 10.0, 5.0, 1.0, |_| {}).unwrap();
        p.add_boolean("On", true, |_| {}).unwrap();
        p.add_button("Go", |_| {}).unwrap();

        let layout = PanelLayout::compute(&p);
        let titles: Vec<&str> = layout.slots.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Speed", "On", "Go"]);

        let speed = layout.slot("Speed").unwrap();
        assert_eq!(speed.area, Rect::new(1, TITLE_BAR_HEIGHT, 18, 2));
        assert_eq!(speed.widget.y, TITLE_BAR_HEIGHT + 1);
        assert_eq!(layout.slot("On").unwrap().area.y, TITLE_BAR_HEIGHT + 2);
        assert!(layout.slot("Go").unwrap().label.is_none());
    }

    #[test]
    fn test_auto_height_fits_controls() {
        let mut p = panel();
        p.add_range("Speed", 0.0, 10.0, 5.0, 1.0, |_| {}).unwrap();
        p.add_boolean("On", true, |_| {}).unwrap();
        // 2 + 1 rows of controls, one border row
        assert_eq!(p.height(), TITLE_BAR_HEIGHT + 4);
    }

    #[test]
    fn test_hit_testing() {
        let mut p = panel();
        p.set_width(20);
        p.add_boolean("On", true, |_| {}).unwrap();
        let layout = PanelLayout::compute(&p);

        assert_eq!(layout.hit(5, 0), Hit::TitleBar);
        match layout.hit(5, i32::from(TITLE_BAR_HEIGHT)) {
            Hit::Control(slot) => assert_eq!(slot.title, "On"),
            other => panic!("unexpected hit {:?}", other),
        }
        assert_eq!(layout.hit(-1, 0), Hit::Outside);
        assert_eq!(layout.hit(25, 0), Hit::Outside);
    }

    #[test]
    fn test_collapsed_layout_has_no_content() {
        let mut p = panel();
        p.add_boolean("On", true, |_| {}).unwrap();
        p.collapse();
        let layout = PanelLayout::compute(&p);
        assert!(layout.content.is_none());
        assert!(layout.slots.is_empty());
        assert_eq!(layout.bounds.height, TITLE_BAR_HEIGHT);
    }

    #[test]
    fn test_hidden_controls_take_no_space() {
        let mut p = panel();
        p.add_boolean("A", true, |_| {}).unwrap();
        p.add_boolean("B", true, |_| {}).unwrap();
        p.hide_control("A").unwrap();
        let layout = PanelLayout::compute(&p);
        assert_eq!(layout.slots.len(), 1);
        assert_eq!(layout.slots[0].title, "B");
    }

    #[test]
    fn test_wrapped_line_count() {
        assert_eq!(wrapped_line_count("", 10), 1);
        assert_eq!(wrapped_line_count("abcdefghijk", 10), 2);
        assert_eq!(wrapped_line_count("a\nb", 10), 2);
    }
}
