// Control View
// Draws one control into its slot of a panel buffer

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::controls::numeric::track_fraction;
use crate::core::{ControlData, ControlEntry, ControlKind, ControlSlot};
use crate::utilities::{format_number, parse_color};
use super::Styles;

/// Per-frame state a control needs beyond its entry
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlState<'a> {
    pub focused: bool,
    /// Text of the open edit buffer, when this control is being edited
    pub edit: Option<&'a str>,
}

/// Render a control into its slot
pub fn render_control(entry: &ControlEntry, slot: &ControlSlot, state: ControlState<'_>, buf: &mut Buffer) {
    let base = if entry.is_enabled() {
        Styles::content().patch(entry.style())
    } else {
        Styles::disabled()
    };
    buf.set_style(slot.area, base);

    if let Some(label) = slot.label {
        let label_style = if entry.is_enabled() {
            Styles::label().patch(entry.style())
        } else {
            base
        };
        put(buf, label, 0, entry.label().unwrap_or(entry.title()), label_style);
    }

    let widget = slot.widget;
    if widget.height == 0 || widget.width == 0 {
        return;
    }
    let row_style = if state.focused && entry.is_enabled() {
        base.patch(Styles::focused())
    } else {
        base
    };

    if let Some(text) = state.edit {
        render_edit(entry.kind(), text, widget, buf);
        return;
    }

    match (entry.kind(), entry.data()) {
        (ControlKind::Range, ControlData::Numeric { min, max, value, .. }) => {
            render_track(track_fraction(*min, *max, *value), widget, row_style, buf);
        }
        (ControlKind::Number, ControlData::Numeric { value, .. }) => {
            put(buf, widget, 0, &format!("[{}]", format_number(*value)), row_style);
        }
        (_, ControlData::Boolean(checked)) => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            put(buf, widget, 0, &format!("{} {}", mark, entry.title()), row_style);
        }
        (_, ControlData::Button) => {
            let text = format!("[ {} ]", entry.title());
            let pad = usize::from(widget.width).saturating_sub(text.chars().count()) / 2;
            put(buf, widget, 0, &format!("{}{}", " ".repeat(pad), text), row_style);
        }
        (ControlKind::Color, ControlData::Text { value, .. }) => {
            render_color(value, entry.is_native(), widget, row_style, buf);
        }
        (ControlKind::Password, ControlData::Text { value, .. }) => {
            put(buf, widget, 0, &mask(value), row_style);
        }
        (ControlKind::TextArea, ControlData::Text { value, .. }) => {
            Paragraph::new(value.as_str())
                .style(row_style)
                .wrap(Wrap { trim: false })
                .render(widget, buf);
        }
        (_, ControlData::Text { value, .. }) => {
            put(buf, widget, 0, value, row_style);
        }
        (_, ControlData::Info(text)) => {
            Paragraph::new(text.as_str())
                .style(base)
                .wrap(Wrap { trim: false })
                .render(widget, buf);
        }
        (_, ControlData::DropDown { items, index }) => {
            let label = items.get(*index).map(|item| item.label.as_str()).unwrap_or("");
            put(buf, widget, 0, &format!("< {} >", label), row_style);
        }
        (_, ControlData::Image { source }) => {
            put(buf, widget, 0, &format!("[image] {}", source), base);
        }
        (_, ControlData::Progress { value, max, .. }) => {
            let ratio = if *max == 0.0 { 0.0 } else { value / max };
            render_progress(ratio, widget, buf);
        }
        (_, ControlData::FileChooser { label, chosen, .. }) => {
            let chosen = chosen
                .as_ref()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            put(buf, widget, 0, &format!("[{}] {}", label, chosen), row_style);
        }
        (_, ControlData::Element(element)) => element.render(widget, buf),
        _ => {}
    }
}

/// Edit buffer with a trailing cursor; long text shows its tail
fn render_edit(kind: ControlKind, text: &str, area: Rect, buf: &mut Buffer) {
    let style = Styles::editing();
    if kind == ControlKind::TextArea {
        let mut shown = text.to_string();
        shown.push('_');
        Paragraph::new(shown).style(style).wrap(Wrap { trim: false }).render(area, buf);
        return;
    }

    let visible = if kind == ControlKind::Password { mask(text) } else { text.to_string() };
    let room = usize::from(area.width).saturating_sub(1);
    put(buf, area, 0, &format!("{}_", tail(&visible, room)), style);
}

/// Slider track with a knob at `fraction`
fn render_track(fraction: f64, area: Rect, style: Style, buf: &mut Buffer) {
    let width = usize::from(area.width);
    let knob = (fraction * (width.saturating_sub(1)) as f64).round() as usize;
    let track: String = (0..width)
        .map(|i| match i.cmp(&knob) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        })
        .collect();
    put(buf, area, 0, &track, style.patch(Styles::fill()));
}

/// Progress fill; ratios outside `0..=1` are clipped to the bar
fn render_progress(ratio: f64, area: Rect, buf: &mut Buffer) {
    let width = usize::from(area.width);
    let filled = filled_cells(ratio, width);
    put(buf, area, 0, &"█".repeat(filled), Styles::fill());
    if filled < width {
        let rest = Rect::new(area.x + filled as u16, area.y, area.width - filled as u16, 1);
        put(buf, rest, 0, &"░".repeat(width - filled), Styles::track());
    }
}

fn render_color(value: &str, native: bool, area: Rect, style: Style, buf: &mut Buffer) {
    match parse_color(value).filter(|_| native) {
        Some((r, g, b)) => {
            put(buf, area, 0, "██", style.fg(Color::Rgb(r, g, b)));
            if area.width > 3 {
                let text = Rect::new(area.x + 3, area.y, area.width - 3, 1);
                put(buf, text, 0, value, style);
            }
        }
        None => put(buf, area, 0, value, style),
    }
}

pub(crate) fn filled_cells(ratio: f64, width: usize) -> usize {
    if !ratio.is_finite() {
        return 0;
    }
    (ratio.clamp(0.0, 1.0) * width as f64).round() as usize
}

pub(crate) fn mask(text: &str) -> String {
    "•".repeat(text.chars().count())
}

fn tail(text: &str, width: usize) -> &str {
    let count = text.chars().count();
    if count <= width {
        return text;
    }
    let skip = count - width;
    text.char_indices().nth(skip).map(|(i, _)| &text[i..]).unwrap_or("")
}

/// Write one row of text, truncated to the area
fn put(buf: &mut Buffer, area: Rect, row: u16, text: &str, style: Style) {
    if row < area.height {
        buf.set_stringn(area.x, area.y + row, text, usize::from(area.width), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fill_is_clipped() {
        assert_eq!(filled_cells(0.5, 10), 5);
        assert_eq!(filled_cells(1.7, 10), 10);
        assert_eq!(filled_cells(-0.3, 10), 0);
        assert_eq!(filled_cells(f64::NAN, 10), 0);
    }

    #[test]
    fn test_mask_counts_characters() {
        assert_eq!(mask("héllo"), "•••••");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_tail_keeps_the_end() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("ab", 3), "ab");
        assert_eq!(tail("ééé", 2), "éé");
    }
}
