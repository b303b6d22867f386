// Panel View
// Renders panels offscreen and composites them onto the frame in stacking order
// Panels may hang off any screen edge; the blit clips them.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
    Frame,
};

use crate::core::{Panel, PanelLayout};
use crate::desktop::Desktop;
use super::control_view::{render_control, ControlState};
use super::Styles;

/// Draw every visible panel, bottom to top
pub fn render_desktop(f: &mut Frame, desktop: &Desktop) {
    let area = f.area();
    for id in desktop.stacking() {
        if let Some(panel) = desktop.panel(id) {
            draw_panel(panel, desktop.active() == Some(id), area, f.buffer_mut());
        }
    }
}

/// Render a panel and blit it at its screen position inside `area`
pub fn draw_panel(panel: &Panel, active: bool, area: Rect, buf: &mut Buffer) {
    if panel.is_hidden() {
        return;
    }
    let offscreen = render_panel(panel, active);
    let (x, y) = panel.position();
    blit(&offscreen, (i32::from(area.x) + x, i32::from(area.y) + y), area, buf);
}

/// Render a panel into its own buffer, origin at the panel's top-left corner
pub fn render_panel(panel: &Panel, active: bool) -> Buffer {
    let layout = PanelLayout::compute(panel);
    let mut buf = Buffer::empty(layout.bounds);

    render_title_bar(panel, &layout, active, &mut buf);

    if let Some(content) = layout.content {
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Styles::border())
            .style(Styles::content())
            .render(content, &mut buf);
    }

    let editing = panel.editing();
    for slot in &layout.slots {
        let Some(entry) = panel.controls().get(&slot.title) else {
            continue;
        };
        let state = ControlState {
            focused: panel.focused() == Some(slot.title.as_str()),
            edit: editing.filter(|(title, _)| *title == slot.title).map(|(_, text)| text),
        };
        render_control(entry, slot, state, &mut buf);
    }

    buf
}

fn render_title_bar(panel: &Panel, layout: &PanelLayout, active: bool, buf: &mut Buffer) {
    let style = if panel.is_dragging() {
        Styles::title_bar_dragging()
    } else if active {
        Styles::title_bar_active()
    } else {
        Styles::title_bar()
    };
    let bar = layout.title_bar;
    buf.set_style(bar, style);

    let marker = match (panel.is_collapsible(), panel.is_collapsed()) {
        (false, _) => "",
        (true, false) => "▾ ",
        (true, true) => "▸ ",
    };
    let title = if panel.is_title_visible() { panel.title() } else { "" };
    buf.set_stringn(bar.x, bar.y, format!("{}{}", marker, title), usize::from(bar.width), style);
}

/// Copy `src` onto `dst` with its top-left at `origin`, skipping cells outside `clip`
pub fn blit(src: &Buffer, origin: (i32, i32), clip: Rect, dst: &mut Buffer) {
    let clip = clip.intersection(dst.area);
    let (left, top) = (i32::from(clip.x), i32::from(clip.y));
    let (right, bottom) = (i32::from(clip.right()), i32::from(clip.bottom()));

    for row in 0..src.area.height {
        let y = origin.1 + i32::from(row);
        if y < top || y >= bottom {
            continue;
        }
        for col in 0..src.area.width {
            let x = origin.0 + i32::from(col);
            if x < left || x >= right {
                continue;
            }
            if let (Some(cell), Some(target)) = (src.cell((col, row)), dst.cell_mut((x as u16, y as u16))) {
                *target = cell.clone();
            }
        }
    }
}
